//! Mock data-management API shared by the integration tests.
#![allow(dead_code)]

use revit_version_report::api::DataManagementClient;
use revit_version_report::auth::TOKEN_PATH;
use revit_version_report::configuration::Configuration;
use revit_version_report::token_cache::SystemClock;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HUB_ID: &str = "b.hub";
pub const TOKEN: &str = "test-token";

pub async fn start_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .mount(&server)
        .await;
    server
}

pub fn configuration(server: &MockServer) -> Configuration {
    Configuration::builder()
        .client_id("client")
        .client_secret("secret")
        .hub_id(HUB_ID)
        .api_base_url(url::Url::parse(&server.uri()).unwrap())
        .build()
        .unwrap()
}

pub fn client(server: &MockServer) -> DataManagementClient {
    DataManagementClient::from_configuration(&configuration(server), Arc::new(SystemClock)).unwrap()
}

pub fn folder(id: &str, name: &str) -> Value {
    json!({ "type": "folders", "id": id, "attributes": { "displayName": name } })
}

pub fn item(id: &str, name: &str) -> Value {
    json!({ "type": "items", "id": id, "attributes": { "displayName": name } })
}

/// An included version resource linked to `item_id`.
pub fn version_of(item_id: &str, revit_version: Option<&str>) -> Value {
    let data = match revit_version {
        Some(v) => json!({ "type": "versions:autodesk.bim360:File", "revitProjectVersion": v }),
        None => json!({ "type": "versions:autodesk.bim360:File" }),
    };
    json!({
        "type": "versions",
        "id": format!("{}?version=1", item_id),
        "attributes": { "extension": { "data": data } },
        "relationships": { "item": { "data": { "type": "items", "id": item_id } } }
    })
}

pub async fn mount_project(server: &MockServer, project_id: &str, name: &str, top_folders: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/project/v1/hubs/{}/projects/{}", HUB_ID, project_id)))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "type": "projects", "id": project_id, "attributes": { "name": name } }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/project/v1/hubs/{}/projects/{}/topFolders", HUB_ID, project_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": top_folders })))
        .mount(server)
        .await;
}

/// Mount a folder listing; `expected_calls` is verified when the server drops.
pub async fn mount_contents(
    server: &MockServer,
    project_id: &str,
    folder_id: &str,
    data: Vec<Value>,
    included: Vec<Value>,
    expected_calls: Option<u64>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/data/v1/projects/{}/folders/{}/contents", project_id, folder_id)))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": data,
            "included": included
        })));
    let mock = match expected_calls {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}
