//! End-to-end REST tests over an in-memory SQLite database

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use common::{print_test_header, test_config};
use company_service::config::Config;
use company_service::infra::storage::entity::employee;
use company_service::module::connect;
use company_service::CompanyServiceModule;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use tower::ServiceExt;

const PROBLEM_JSON: &str = "application/problem+json";
const PASSWORD: &str = "Password1000";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap()
    }
}

fn api_config() -> Config {
    let mut config = test_config();
    config.rate_limit.enabled = false;
    config
}

async fn spawn_app(config: Config) -> TestApp {
    let module = CompanyServiceModule::default();
    let db = connect(&config.database).await.unwrap();
    module.migrate(&db).await.unwrap();
    module.init_with_connection(config, db.clone());
    TestApp {
        router: module.router().unwrap(),
        db,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    async fn get(&self, uri: &str) -> Reply {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn get_with(&self, uri: &str, headers: &[(&str, &str)]) -> Reply {
        let mut builder = Request::get(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn json(&self, method: Method, uri: &str, body: &Value) -> Reply {
        self.json_raw(method, uri, "application/json", body.to_string())
            .await
    }

    async fn json_raw(&self, method: Method, uri: &str, content_type: &str, body: String) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn delete(&self, uri: &str) -> Reply {
        self.send(
            Request::delete(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn create_company(&self, name: &str, employees: Value) -> String {
        let reply = self
            .json(
                Method::POST,
                "/api/companies",
                &json!({
                    "name": name,
                    "address": "312 Forest Avenue, BF 923",
                    "country": "USA",
                    "employees": employees
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
        reply.json()["id"].as_str().unwrap().to_string()
    }

    async fn register(&self, user_name: &str, roles: &[&str]) {
        let reply = self
            .json(
                Method::POST,
                "/api/authentication",
                &json!({
                    "firstName": "Test",
                    "lastName": "User",
                    "userName": user_name,
                    "password": PASSWORD,
                    "email": format!("{user_name}@example.com"),
                    "roles": roles
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
    }

    async fn login(&self, user_name: &str) -> Value {
        let reply = self
            .json(
                Method::POST,
                "/api/authentication/login",
                &json!({ "userName": user_name, "password": PASSWORD }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
        reply.json()
    }
}

fn bearer(tokens: &Value) -> String {
    format!("Bearer {}", tokens["accessToken"].as_str().unwrap())
}

// ---------------------------------------------------------------------------
// Root and errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_links_require_the_root_media_type() {
    let app = spawn_app(api_config()).await;

    let plain = app.get("/api").await;
    assert_eq!(plain.status, StatusCode::NO_CONTENT);

    let root = app
        .get_with(
            "/api",
            &[("accept", "application/vnd.companyemployees.apiroot+json")],
        )
        .await;
    assert_eq!(root.status, StatusCode::OK);
    let rels: Vec<String> = root
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["rel"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(rels, vec!["self", "companies", "create_company"]);
}

#[tokio::test]
async fn unknown_route_is_a_problem_document() {
    let app = spawn_app(api_config()).await;

    let reply = app.get("/api/unknown/thing").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.header("content-type"), PROBLEM_JSON);
    assert_eq!(reply.json()["instance"], "/api/unknown/thing");
}

#[tokio::test]
async fn unsupported_api_version_is_rejected() {
    let app = spawn_app(api_config()).await;

    let reply = app
        .get_with("/api/companies/collection/()", &[("api-version", "3.0")])
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.header("api-supported-versions"), "1.0, 2.0");
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn company_lifecycle_over_http() {
    print_test_header(
        "company_lifecycle_over_http",
        "Create, read, update and delete a company through the REST surface",
    );
    let app = spawn_app(api_config()).await;

    let created = app
        .json(
            Method::POST,
            "/api/companies",
            &json!({ "name": "Admin_Solutions Ltd", "address": "312 Forest Avenue", "country": "USA" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["id"].as_str().unwrap().to_string();
    assert_eq!(created.header("location"), format!("/api/companies/{id}"));

    let fetched = app.get(&format!("/api/companies/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(
        fetched.json(),
        json!({ "id": id, "name": "Admin_Solutions Ltd", "fullAddress": "312 Forest Avenue USA" })
    );

    let updated = app
        .json(
            Method::PUT,
            &format!("/api/companies/{id}"),
            &json!({ "name": "Renamed Ltd", "address": "1 Main St", "country": "UK" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.get(&format!("/api/companies/{id}")).await.json()["name"],
        "Renamed Ltd"
    );

    let deleted = app.delete(&format!("/api/companies/{id}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app.get(&format!("/api/companies/{id}")).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing.json()["detail"],
        format!("The company with id: {id} doesn't exist in the database.")
    );
}

#[tokio::test]
async fn company_body_errors_map_to_400_and_422() {
    let app = spawn_app(api_config()).await;

    let null_body = app
        .json_raw(Method::POST, "/api/companies", "application/json", "null".to_string())
        .await;
    assert_eq!(null_body.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        null_body.json()["detail"],
        "CompanyForCreationDto object sent from client is null."
    );

    let malformed = app
        .json_raw(Method::POST, "/api/companies", "application/json", "{".to_string())
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    let invalid = app
        .json(
            Method::POST,
            "/api/companies",
            &json!({ "name": "x".repeat(61), "country": "USA" }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(invalid.header("content-type"), PROBLEM_JSON);
    let errors = &invalid.json()["errors"];
    assert_eq!(
        errors["name"][0],
        "Maximum length for the Name is 60 characters."
    );
    assert_eq!(errors["address"][0], "Company address is a required field.");

    let bad_id = app.get("/api/companies/not-a-guid").await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn company_collection_round_trip() {
    let app = spawn_app(api_config()).await;

    let created = app
        .json(
            Method::POST,
            "/api/companies/collection",
            &json!([
                { "name": "First Co", "address": "1 First St", "country": "USA" },
                { "name": "Second Co", "address": "2 Second St", "country": "USA" }
            ]),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let ids: Vec<String> = created
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    let location = created.header("location").to_string();
    assert_eq!(
        location,
        format!("/api/companies/collection/({},{})", ids[0], ids[1])
    );

    let fetched = app.get(&location).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json().as_array().unwrap().len(), 2);

    let unknown = app
        .get(&format!(
            "/api/companies/collection/({},{})",
            ids[0],
            uuid::Uuid::new_v4()
        ))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let empty = app
        .json(Method::POST, "/api/companies/collection", &json!([]))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn company_reads_carry_cache_validators() {
    print_test_header(
        "company_reads_carry_cache_validators",
        "ETag and Cache-Control on reads; a matching If-None-Match answers 304",
    );
    let app = spawn_app(api_config()).await;
    let id = app.create_company("Cached Inc", json!([])).await;
    let uri = format!("/api/companies/{id}");

    let first = app.get(&uri).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.header("cache-control"), "public, max-age=120");
    let etag = first.header("etag").to_string();

    let revalidated = app.get_with(&uri, &[("if-none-match", etag.as_str())]).await;
    assert_eq!(revalidated.status, StatusCode::NOT_MODIFIED);
    assert!(revalidated.body.is_empty());

    let stale = app
        .get_with(&uri, &[("if-none-match", "\"something-else\"")])
        .await;
    assert_eq!(stale.status, StatusCode::OK);
}

#[tokio::test]
async fn options_lists_allowed_methods() {
    let app = spawn_app(api_config()).await;
    let reply = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/companies")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header("allow"), "GET, OPTIONS, POST");

    let preflight = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/companies")
                .header(header::ORIGIN, "https://client.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(preflight.status, StatusCode::OK);
    assert_eq!(preflight.header("access-control-allow-origin"), "*");
    assert!(preflight.headers.contains_key("access-control-allow-methods"));
    assert!(preflight.headers.get("allow").is_none());

    let cross_origin = app
        .get_with("/api", &[("origin", "https://client.example")])
        .await;
    assert_eq!(cross_origin.header("access-control-allow-origin"), "*");
}

// ---------------------------------------------------------------------------
// Authentication and the protected company list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn company_list_requires_manager_token() {
    print_test_header(
        "company_list_requires_manager_token",
        "401 without a token, 403 without the Manager role, 200 with it",
    );
    let app = spawn_app(api_config()).await;
    app.create_company("Beta Corp", json!([])).await;
    app.create_company("Alpha Corp", json!([])).await;

    let anonymous = app.get("/api/companies").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    app.register("plain", &[]).await;
    let plain = app.login("plain").await;
    let forbidden = app
        .get_with("/api/companies", &[("authorization", bearer(&plain).as_str())])
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    app.register("boss", &["Manager"]).await;
    let boss = app.login("boss").await;
    let auth = bearer(&boss);

    let listed = app
        .get_with("/api/companies", &[("authorization", auth.as_str())])
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let names: Vec<String> = listed
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Alpha Corp", "Beta Corp"]);

    let v2 = app
        .get_with(
            "/api/companies",
            &[("authorization", auth.as_str()), ("api-version", "2.0")],
        )
        .await;
    assert_eq!(v2.json()[0]["name"], "Alpha Corp V2");

    let v2_query = app
        .get_with("/api/companies?api-version=2", &[("authorization", auth.as_str())])
        .await;
    assert_eq!(v2_query.json()[0]["name"], "Alpha Corp V2");

    let csv = app
        .get_with(
            "/api/companies",
            &[("authorization", auth.as_str()), ("accept", "text/csv")],
        )
        .await;
    assert_eq!(csv.status, StatusCode::OK);
    assert_eq!(csv.header("content-type"), "text/csv");
    assert!(csv.text().contains(",\"Alpha Corp\",\"312 Forest Avenue, BF 923 USA\""));

    let xml = app
        .get_with(
            "/api/companies",
            &[("authorization", auth.as_str()), ("accept", "application/xml")],
        )
        .await;
    assert_eq!(xml.status, StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn login_and_refresh_flow() {
    let app = spawn_app(api_config()).await;
    app.register("refresher", &["Administrator"]).await;

    let duplicate = app
        .json(
            Method::POST,
            "/api/authentication",
            &json!({ "userName": "refresher", "password": "short", "roles": ["Nope"] }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    let errors = duplicate.json()["errors"].clone();
    assert!(errors.get("DuplicateUserName").is_some());
    assert!(errors.get("PasswordTooShort").is_some());
    assert!(errors.get("InvalidRole").is_some());

    let missing = app
        .json(
            Method::POST,
            "/api/authentication/login",
            &json!({ "userName": "refresher" }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let wrong = app
        .json(
            Method::POST,
            "/api/authentication/login",
            &json!({ "userName": "refresher", "password": "WrongPassword" }),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let tokens = app.login("refresher").await;
    let refreshed = app
        .json(Method::POST, "/api/token/refresh", &tokens)
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let rotated = refreshed.json();
    assert_ne!(rotated["refreshToken"], tokens["refreshToken"]);

    let replayed = app
        .json(Method::POST, "/api/token/refresh", &tokens)
        .await;
    assert_eq!(replayed.status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

fn staff() -> Value {
    json!([
        { "name": "Sam Raiden", "age": 26, "position": "Developer" },
        { "name": "Jana McLeaf", "age": 30, "position": "Developer" },
        { "name": "Kane Miller", "age": 35, "position": "Administrator" },
        { "name": "Martin Smith", "age": 45, "position": "Manager" },
        { "name": "Anna Samuels", "age": 52, "position": "Director" }
    ])
}

#[tokio::test]
async fn employee_list_pages_and_reports_metadata() {
    print_test_header(
        "employee_list_pages_and_reports_metadata",
        "Paging, ordering and the X-Pagination header",
    );
    let app = spawn_app(api_config()).await;
    let company_id = app.create_company("Staffed Inc", staff()).await;

    let reply = app
        .get(&format!(
            "/api/companies/{company_id}/employees?pageNumber=2&pageSize=2&orderBy=age%20desc"
        ))
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let pagination: Value = serde_json::from_str(reply.header("x-pagination")).unwrap();
    assert_eq!(
        pagination,
        json!({
            "CurrentPage": 2,
            "TotalPages": 3,
            "PageSize": 2,
            "TotalCount": 5,
            "HasPrevious": true,
            "HasNext": true
        })
    );
    let ages: Vec<i64> = reply
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["age"].as_i64().unwrap())
        .collect();
    assert_eq!(ages, vec![35, 30]);

    let filtered = app
        .get(&format!(
            "/api/companies/{company_id}/employees?minAge=30&maxAge=45&searchTerm=m"
        ))
        .await;
    let names: Vec<String> = filtered
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Jana McLeaf", "Kane Miller", "Martin Smith"]);

    let inverted = app
        .get(&format!(
            "/api/companies/{company_id}/employees?minAge=50&maxAge=20"
        ))
        .await;
    assert_eq!(inverted.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        inverted.json()["detail"],
        "Max age can't be less than min age."
    );

    let unknown = app
        .get(&format!("/api/companies/{}/employees", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employee_pages_past_the_end_are_empty() {
    let app = spawn_app(api_config()).await;
    let company_id = app.create_company("Deep Paging Inc", staff()).await;

    for page in ["1000000000000000000", "18446744073709551615"] {
        let reply = app
            .get(&format!(
                "/api/companies/{company_id}/employees?pageNumber={page}&pageSize=10"
            ))
            .await;
        assert_eq!(reply.status, StatusCode::OK, "page {page}: {}", reply.text());
        assert_eq!(reply.json(), json!([]));

        let pagination: Value = serde_json::from_str(reply.header("x-pagination")).unwrap();
        assert_eq!(pagination["TotalCount"], 5);
        assert_eq!(pagination["HasNext"], false);
        assert_eq!(pagination["HasPrevious"], true);
    }
}

#[tokio::test]
async fn employee_search_treats_wildcards_literally() {
    let app = spawn_app(api_config()).await;
    let company_id = app
        .create_company(
            "Wildcard Inc",
            json!([
                { "name": "Ann Lee", "age": 30, "position": "Clerk" },
                { "name": "Bob_Ray", "age": 31, "position": "Clerk" },
                { "name": "Cy 50% Off", "age": 32, "position": "Clerk" }
            ]),
        )
        .await;

    let names_for = |reply: Reply| -> Vec<String> {
        reply
            .json()
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect()
    };

    let underscore = app
        .get(&format!("/api/companies/{company_id}/employees?searchTerm=_"))
        .await;
    assert_eq!(names_for(underscore), vec!["Bob_Ray"]);

    let percent = app
        .get(&format!("/api/companies/{company_id}/employees?searchTerm=%25"))
        .await;
    assert_eq!(names_for(percent), vec!["Cy 50% Off"]);
}

#[tokio::test]
async fn employee_list_shapes_fields_and_links() {
    let app = spawn_app(api_config()).await;
    let company_id = app.create_company("Shaped Inc", staff()).await;

    let shaped = app
        .get(&format!(
            "/api/companies/{company_id}/employees?fields=Name,age"
        ))
        .await;
    let first = shaped.json()[0].clone();
    assert_eq!(first["name"], "Anna Samuels");
    assert_eq!(first["age"], 52);
    assert!(first.get("position").is_none());
    assert!(first.get("id").is_none());

    let linked = app
        .get_with(
            &format!("/api/companies/{company_id}/employees?fields=name"),
            &[("accept", "application/vnd.companyemployees.hateoas+json")],
        )
        .await;
    assert_eq!(linked.status, StatusCode::OK);
    assert_eq!(
        linked.header("content-type"),
        "application/vnd.companyemployees.hateoas+json"
    );
    let body = linked.json();
    let entry = &body["value"][0];
    assert_eq!(entry["name"], "Anna Samuels");
    let rels: Vec<&str> = entry["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["rel"].as_str().unwrap())
        .collect();
    assert_eq!(
        rels,
        vec!["self", "delete_employee", "update_employee", "partially_update_employee"]
    );
    assert_eq!(
        body["links"][0]["href"],
        format!("/api/companies/{company_id}/employees?fields=name")
    );
}

#[tokio::test]
async fn employee_crud_and_patch() {
    print_test_header(
        "employee_crud_and_patch",
        "Create, read, replace, patch and delete one employee",
    );
    let app = spawn_app(api_config()).await;
    let company_id = app.create_company("Crud Inc", json!([])).await;
    let base = format!("/api/companies/{company_id}/employees");

    let created = app
        .json(
            Method::POST,
            &base,
            &json!({ "name": "Geil Metain", "age": 23, "position": "Marketing" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["id"].as_str().unwrap().to_string();
    let uri = format!("{base}/{id}");
    assert_eq!(created.header("location"), uri);

    let too_young = app
        .json(
            Method::POST,
            &base,
            &json!({ "name": "Kid", "age": 12, "position": "Intern" }),
        )
        .await;
    assert_eq!(too_young.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(too_young.json()["errors"].get("age").is_some());

    let replaced = app
        .json(
            Method::PUT,
            &uri,
            &json!({ "name": "Geil Metain", "age": 24, "position": "Sales" }),
        )
        .await;
    assert_eq!(replaced.status, StatusCode::NO_CONTENT);

    let patched = app
        .json_raw(
            Method::PATCH,
            &uri,
            "application/json-patch+json",
            json!([{ "op": "replace", "path": "/age", "value": 30 }]).to_string(),
        )
        .await;
    assert_eq!(patched.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.get(&uri).await.json(),
        json!({ "id": id, "name": "Geil Metain", "age": 30, "position": "Sales" })
    );

    let invalid_patch = app
        .json_raw(
            Method::PATCH,
            &uri,
            "application/json-patch+json",
            json!([{ "op": "remove", "path": "/name" }]).to_string(),
        )
        .await;
    assert_eq!(invalid_patch.status, StatusCode::UNPROCESSABLE_ENTITY);

    let null_patch = app
        .json_raw(Method::PATCH, &uri, "application/json-patch+json", "null".to_string())
        .await;
    assert_eq!(null_patch.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        null_patch.json()["detail"],
        "Patch object sent from client is null."
    );

    let malformed_patch = app
        .json_raw(Method::PATCH, &uri, "application/json-patch+json", "{".to_string())
        .await;
    assert_eq!(malformed_patch.status, StatusCode::BAD_REQUEST);

    let unknown_member = app
        .json_raw(
            Method::PATCH,
            &uri,
            "application/json-patch+json",
            json!([{ "op": "replace", "path": "/salary", "value": 1 }]).to_string(),
        )
        .await;
    assert_eq!(unknown_member.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(unknown_member.json()["errors"].get("patch").is_some());
    assert_eq!(
        app.get(&uri).await.json()["age"],
        30,
        "rejected patches leave the employee unchanged"
    );

    let deleted = app.delete(&uri).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_company_cascades_to_employees() {
    let app = spawn_app(api_config()).await;
    let doomed = app.create_company("Doomed Inc", staff()).await;
    let kept = app
        .create_company("Kept Inc", json!([{ "name": "Stays", "age": 40, "position": "Clerk" }]))
        .await;
    assert_eq!(employee::Entity::find().count(&app.db).await.unwrap(), 6);

    let deleted = app.delete(&format!("/api/companies/{doomed}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    assert_eq!(employee::Entity::find().count(&app.db).await.unwrap(), 1);
    let remaining = app.get(&format!("/api/companies/{kept}/employees")).await;
    assert_eq!(remaining.json().as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clients_over_quota_get_429() {
    let mut config = test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.limit = 2;
    config.rate_limit.period_secs = 60;
    let app = spawn_app(config).await;

    for remaining in ["1", "0"] {
        let reply = app
            .get_with("/api", &[("x-forwarded-for", "203.0.113.7")])
            .await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert_eq!(reply.header("x-rate-limit-limit"), "2");
        assert_eq!(reply.header("x-rate-limit-remaining"), remaining);
    }

    let limited = app
        .get_with("/api", &[("x-forwarded-for", "203.0.113.7")])
        .await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key("retry-after"));
    assert_eq!(
        limited.json()["detail"],
        "API calls quota exceeded! maximum admitted 2 per 60s."
    );

    let other_client = app
        .get_with("/api", &[("x-forwarded-for", "198.51.100.1")])
        .await;
    assert_eq!(other_client.status, StatusCode::NO_CONTENT);
}
