use hal_view::catalog::{ClassSchema, StaticCatalog};
use hal_view::config::{Options, Settings};
use hal_view::definition::{DefinitionRegistry, ResourceDefinition, ResourcePropertyDefinition};
use hal_view::object::{Entity, EntityIdentity, Instance, ObjectAccess};
use hal_view::routing::{Route, RouteTable, RoutingError};
use hal_view::view::{HalResourceBuilder, HalView};
use hal_view::HalError;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::sync::Arc;

const SHOP: &str = r#"
apis:
  default:
    resources:
      item:
        className: Item
        routeValues:
          '@controller': Item
          '@action': show
      items:
        collectionOf: item
        includeProperties: [name]
        routeValues:
          '@controller': Item
          '@action': index
      order:
        className: Order
        properties:
          owner:
            type: string
        links:
          items:
            resource: items
            title: All items
          search:
            routeValues:
              '@controller': Item
              '@action': index
              page: 1
            append: 'q=widget'
      user:
        className: User
        includeProperties: [name]
        routeValues:
          '@controller': User
          '@action': show
      broken:
        properties:
          name: {}
        links:
          nowhere:
            routeValues:
              '@controller': Invoice
              '@action': show
"#;

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .register(
            ClassSchema::new("Item")
                .field("id", "integer")
                .field("name", "string")
                .field("secret", "string"),
        )
        .register(
            ClassSchema::new("Order")
                .field("total", "float")
                .field("user", "Acme\\User"),
        )
        .register(ClassSchema::new("User").field("name", "string").field("email", "string"))
}

fn routes() -> RouteTable {
    RouteTable::new("https://shop.example.com")
        .route(Route::new("Item", "show", "items/{item}"))
        .route(Route::new("Item", "index", "items"))
        .route(Route::new("User", "show", "users/{user}"))
        .route(Route::new("User", "show", "users/by-id/{id}"))
}

fn view(yaml: &str) -> HalView {
    let settings = Settings::from_yaml_str(yaml).unwrap();
    HalView::new(&settings, "default", Arc::new(catalog()), routes()).unwrap()
}

fn item(id: u64, name: &str) -> Instance {
    Instance::from(
        Entity::new("Item")
            .with_identity(id.to_string())
            .with("id", id)
            .with("name", name)
            .with("secret", "hidden"),
    )
}

#[test]
fn test_collection_embeds_abbreviated_members() {
    let mut view = view(SHOP);
    let items = Instance::from(vec![item(1, "Bolt"), item(2, "Nut"), item(3, "Gear")]);
    let resource = view.render_resource("items", &items).unwrap();

    assert_eq!(resource.self_uri(), Some("/items"));
    let members = resource.embedded_resources("items");
    assert_eq!(members.len(), 3);
    for (member, (id, name)) in members.iter().zip([("1", "Bolt"), ("2", "Nut"), ("3", "Gear")]) {
        let keys: Vec<&str> = member.data().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(member.data()["id"], json!(id));
        assert_eq!(member.data()["name"], json!(name));
        assert_eq!(member.self_uri(), Some(format!("/items/{id}").as_str()));
    }
}

#[test]
fn test_empty_and_single_collections_render_as_arrays() {
    let mut view = view(SHOP);
    let empty = view.render_resource("items", &Instance::List(Vec::new())).unwrap();
    let single = view.render_resource("items", &Instance::from(vec![item(1, "Bolt")])).unwrap();

    let empty = serde_json::to_value(&empty).unwrap();
    let single = serde_json::to_value(&single).unwrap();
    assert_eq!(empty["_embedded"]["items"], json!([]));
    assert!(single["_embedded"]["items"].is_array());
}

#[test]
fn test_missing_singular_embed_is_omitted() {
    let mut view = view(SHOP);
    let order = Instance::from(Entity::new("Order").with_identity("o-1").with("total", 9.5));
    let resource = view.render_resource("order", &order).unwrap();
    assert!(resource.embedded().is_empty());

    let json = serde_json::to_value(&resource).unwrap();
    assert!(json.get("_embedded").is_none());
}

#[test]
fn test_present_singular_embed_uses_include_properties() {
    let mut view = view(SHOP);
    let user = Entity::new("User")
        .with_identity("u-7")
        .with("name", "Ann")
        .with("email", "ann@example.com");
    let order = Instance::from(
        Entity::new("Order")
            .with_identity("o-1")
            .with("total", 9.5)
            .with("user", user),
    );
    let json = serde_json::to_value(view.render_resource("order", &order).unwrap()).unwrap();
    assert_eq!(
        json["_embedded"]["user"],
        json!({"id": "u-7", "name": "Ann", "_links": {"self": {"href": "/users/u-7"}}})
    );
}

#[test]
fn test_root_resource_fields_and_links() {
    let mut view = view(SHOP);
    let owner = Entity::new("User").with_identity("u-7").with("name", "Ann");
    let order = Instance::from(
        Entity::new("Order")
            .with_identity("o-1")
            .with("total", 9.5)
            .with("owner", owner),
    );
    let json = serde_json::to_value(view.render_resource("order", &order).unwrap()).unwrap();

    assert_eq!(json["id"], json!("o-1"));
    assert_eq!(json["total"], json!(9.5));
    assert_eq!(json["owner"], json!("u-7"));
    assert_eq!(
        json["_links"]["items"],
        json!({"href": "/items", "title": "All items"})
    );
    assert_eq!(json["_links"]["search"]["href"], json!("/items?page=1&q=widget"));
}

#[test]
fn test_id_is_first_field() {
    let mut view = view(SHOP);
    let order = Instance::from(Entity::new("Order").with_identity("o-1").with("total", 1.0));
    let resource = view.render_resource("order", &order).unwrap();
    assert_eq!(resource.data().keys().next().map(String::as_str), Some("id"));
}

#[test]
fn test_unresolvable_link_names_rel_and_resource() {
    let mut view = view(SHOP);
    let instance = Instance::from(Entity::new("Thing").with("name", "x"));
    let err = view.render_resource("broken", &instance).unwrap_err();
    match err {
        HalError::LinkResolution { rel, resource, source } => {
            assert_eq!(rel, "nowhere");
            assert_eq!(resource, "broken");
            assert!(matches!(source, RoutingError::NoMatchingRoute { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_user_scenario() {
    let yaml = r#"
apis:
  default:
    resources:
      user:
        className: User
        properties:
          name: {}
        links:
          self:
            routeValues:
              '@action': show
              '@controller': User
              id: '{id}'
"#;
    let settings = Settings::from_yaml_str(yaml).unwrap();
    let routes = RouteTable::new("").route(Route::new("User", "show", "users/{id}"));
    let mut view = HalView::new(&settings, "default", Arc::new(StaticCatalog::new()), routes).unwrap();
    view.assign("user", Entity::new("User").with("id", 42).with("name", "Ann"));

    let document = view.render().unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&document.body).unwrap();
    assert_eq!(
        json,
        json!({"name": "Ann", "_links": {"self": {"href": "/users/42"}}})
    );
}

#[test]
fn test_placeholder_reads_render_variables_first() {
    let yaml = r#"
apis:
  default:
    resources:
      user:
        properties:
          name: {}
        links:
          team:
            routeValues:
              '@action': show
              '@controller': User
              id: '{team.lead}'
"#;
    let settings = Settings::from_yaml_str(yaml).unwrap();
    let routes = RouteTable::new("").route(Route::new("User", "show", "users/{id}"));
    let mut view = HalView::new(&settings, "default", Arc::new(StaticCatalog::new()), routes).unwrap();
    view.assign("user", Entity::new("User").with("name", "Ann"));
    view.assign("team", Entity::new("Team").with("lead", "bob"));

    let document = view.render().unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&document.body).unwrap();
    assert_eq!(json["_links"]["team"]["href"], json!("/users/bob"));
}

#[test]
fn test_render_without_resource_variable() {
    let mut view = view(SHOP);
    view.assign("settings", Instance::Null);
    view.assign("_private", Instance::from(1));
    assert!(view.render().unwrap().is_none());

    let mut view = self::view(SHOP);
    view.assign("order", Instance::Null);
    assert!(view.render().unwrap().is_none());
}

#[test]
fn test_cache_lifetime_becomes_cache_control() {
    let yaml = r#"
apis:
  default:
    commonConfiguration:
      cacheLifetime: 300
    resources:
      status:
        properties:
          state: {}
"#;
    let settings = Settings::from_yaml_str(yaml).unwrap();
    let mut view =
        HalView::new(&settings, "default", Arc::new(StaticCatalog::new()), RouteTable::new("")).unwrap();
    view.assign("status", Entity::new("Status").with("state", "ok"));
    let document = view.render().unwrap().unwrap();
    assert_eq!(document.cache_control.as_deref(), Some("max-age=300"));
    assert_eq!(document.body, r#"{"state":"ok"}"#);
}

#[test]
fn test_render_entity_by_class() {
    let mut view = view(SHOP);
    let resource = view.render_entity(&item(5, "Cog")).unwrap();
    assert_eq!(resource.self_uri(), Some("/items/5"));
    assert_eq!(resource.data()["name"], json!("Cog"));
    assert_eq!(resource.data()["secret"], json!("hidden"));
}

#[test]
fn test_unknown_resource_is_configuration_error() {
    let mut view = view(SHOP);
    let err = view.render_resource("invoice", &Instance::Null).unwrap_err();
    assert!(matches!(err, HalError::Configuration(_)));
}

const ALIASES: &str = r#"
apis:
  default:
    resources:
      user:
        className: User
        includeProperties: [name]
        routeValues:
          '@controller': User
          '@action': show
        links:
          home:
            title: Home
            routeValues:
              '@controller': Item
              '@action': index
          items:
            resource: items
      author:
        aliasFor: user
        links:
          home:
            title: Author home
            routeValues:
              '@controller': Item
              '@action': index
              page: 2
      item:
        className: Item
        routeValues:
          '@controller': Item
          '@action': show
      items:
        collectionOf: item
        includeProperties: [name]
        routeValues:
          '@controller': Item
          '@action': index
      catalogue:
        aliasFor: items
        includeProperties: [name, secret]
      storefront:
        properties:
          title: {}
        links:
          shop:
            absolute: true
            routeValues:
              '@controller': Item
              '@action': index
"#;

fn ann() -> Instance {
    Instance::from(
        Entity::new("User")
            .with_identity("7")
            .with("name", "Ann")
            .with("email", "ann@example.com"),
    )
}

#[test]
fn test_alias_renders_with_target_shape_and_route() {
    let mut view = view(ALIASES);
    let json = serde_json::to_value(view.render_resource("author", &ann()).unwrap()).unwrap();

    assert_eq!(json["id"], json!("7"));
    assert_eq!(json["name"], json!("Ann"));
    assert!(json.get("email").is_none());
    // bound under the target's name, which `users/{user}` expects
    assert_eq!(json["_links"]["self"]["href"], json!("/users/7"));
}

#[test]
fn test_alias_overrides_and_inherits_links() {
    let mut view = view(ALIASES);
    let json = serde_json::to_value(view.render_resource("author", &ann()).unwrap()).unwrap();

    let rels: Vec<&str> = json["_links"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(rels, vec!["self", "home", "items"]);
    assert_eq!(
        json["_links"]["home"],
        json!({"href": "/items?page=2", "title": "Author home"})
    );
    assert_eq!(json["_links"]["items"], json!({"href": "/items"}));
}

#[test]
fn test_alias_over_collection() {
    let mut view = view(ALIASES);
    let items = Instance::from(vec![item(1, "Bolt"), item(2, "Nut")]);
    let resource = view.render_resource("catalogue", &items).unwrap();

    assert_eq!(resource.self_uri(), Some("/items"));
    let members = resource.embedded_resources("catalogue");
    assert_eq!(members.len(), 2);
    assert_eq!(
        serde_json::to_value(&members[1]).unwrap(),
        json!({
            "id": "2",
            "name": "Nut",
            "secret": "hidden",
            "_links": {"self": {"href": "/items/2"}}
        })
    );
}

#[test]
fn test_absolute_link_uses_base_uri() {
    let mut view = view(ALIASES);
    let storefront = Instance::from(Entity::new("Storefront").with("title", "Main"));
    let json = serde_json::to_value(view.render_resource("storefront", &storefront).unwrap()).unwrap();
    assert_eq!(
        json["_links"]["shop"]["href"],
        json!("https://shop.example.com/items")
    );
}

fn options(value: Value) -> Options {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_embedded_resources_sharing_a_link_name_accumulate() {
    let mut registry = DefinitionRegistry::new();
    let mut user = ResourceDefinition::new(
        "user",
        options(json!({
            "includeProperties": ["name"],
            "routeValues": {"@controller": "User", "@action": "show"}
        })),
    );
    user.add_property_definition(ResourcePropertyDefinition::new("name"));
    let user = registry.insert(user);

    let mut article = ResourceDefinition::new("article", Options::new());
    article.add_property_definition(ResourcePropertyDefinition::new("title"));
    article.add_embedded_resource_definition("author", user);
    article.add_embedded_resource_definition("editor", user);
    let article = registry.insert(article);

    let routes = routes();
    let variables = IndexMap::new();
    let builder = HalResourceBuilder::new(&ObjectAccess, &EntityIdentity, &routes, &variables);
    let person = |id: &str, name: &str| Entity::new("User").with_identity(id).with("name", name);

    let both = Instance::from(
        Entity::new("Article")
            .with("title", "Hello")
            .with("author", person("u-1", "Ann"))
            .with("editor", person("u-2", "Bob")),
    );
    let json = serde_json::to_value(builder.build(registry.get(article), &both).unwrap()).unwrap();
    assert_eq!(
        json["_embedded"]["user"],
        json!([
            {"id": "u-1", "name": "Ann", "_links": {"self": {"href": "/users/u-1"}}},
            {"id": "u-2", "name": "Bob", "_links": {"self": {"href": "/users/u-2"}}}
        ])
    );

    let author_only = Instance::from(
        Entity::new("Article")
            .with("title", "Hello")
            .with("author", person("u-1", "Ann")),
    );
    let json =
        serde_json::to_value(builder.build(registry.get(article), &author_only).unwrap()).unwrap();
    assert!(json["_embedded"]["user"].is_object());
}
