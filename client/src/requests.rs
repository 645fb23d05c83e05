//! Stateless request builder and response parser for the eventstore API.
//!
//! # Design
//! `EventstoreRequests` holds only the endpoint and JSON options. Each
//! operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `EventstoreClient` runs the transport in between; tests can drive the
//! two halves directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::JsonOptions;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{EventstoreEntity, EventstoreResult};

#[derive(Debug, Clone)]
pub struct EventstoreRequests {
    endpoint: String,
    json: JsonOptions,
}

impl EventstoreRequests {
    pub fn new(endpoint: &str) -> Self {
        Self::with_json_options(endpoint, JsonOptions::default())
    }

    pub fn with_json_options(endpoint: &str, json: JsonOptions) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            json,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_add<T: Serialize>(&self, storename: &str, id: &str, value: &T) -> Result<HttpRequest> {
        self.build_with_body(HttpMethod::Post, storename, id, value)
    }

    pub fn build_save<T: Serialize>(&self, storename: &str, id: &str, value: &T) -> Result<HttpRequest> {
        self.build_with_body(HttpMethod::Put, storename, id, value)
    }

    pub fn build_get(&self, storename: &str, id: &str) -> Result<HttpRequest> {
        validate(storename, id)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.entity_url(storename, id)?.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_by_version(&self, storename: &str, id: &str, version: u64) -> Result<HttpRequest> {
        validate(storename, id)?;
        let mut url = self.entity_url(storename, id)?;
        url.query_pairs_mut().append_pair("version", &version.to_string());
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Add succeeds only on 201 Created.
    pub fn parse_add<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<EventstoreResult<T>> {
        parse_entity(response, |r| r.status == 201)
    }

    /// Save succeeds only on 200 OK.
    pub fn parse_save<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<EventstoreResult<T>> {
        parse_entity(response, |r| r.status == 200)
    }

    pub fn parse_get<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<EventstoreResult<T>> {
        parse_entity(response, HttpResponse::is_success)
    }

    pub fn parse_get_by_version<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<EventstoreResult<T>> {
        parse_entity(response, HttpResponse::is_success)
    }

    /// Store name and id are percent-encoded as single path segments.
    fn entity_url(&self, storename: &str, id: &str) -> Result<Url> {
        let invalid = || Error::InvalidArgument { name: "endpoint" };
        let mut url = Url::parse(&self.endpoint).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["eventstores", storename, "entities", id]);
        Ok(url)
    }

    fn build_with_body<T: Serialize>(
        &self,
        method: HttpMethod,
        storename: &str,
        id: &str,
        value: &T,
    ) -> Result<HttpRequest> {
        validate(storename, id)?;
        let ety = EventstoreEntity::outgoing(id, value);
        let body = if self.json.pretty {
            serde_json::to_string_pretty(&ety)
        } else {
            serde_json::to_string(&ety)
        }
        .map_err(Error::Serialization)?;
        Ok(HttpRequest {
            method,
            url: self.entity_url(storename, id)?.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Store name is checked before id.
fn validate(storename: &str, id: &str) -> Result<()> {
    if storename.is_empty() {
        return Err(Error::InvalidArgument { name: "storename" });
    }
    if id.is_empty() {
        return Err(Error::InvalidArgument { name: "id" });
    }
    Ok(())
}

fn parse_entity<T: DeserializeOwned>(
    response: HttpResponse,
    accept: impl Fn(&HttpResponse) -> bool,
) -> Result<EventstoreResult<T>> {
    if !accept(&response) {
        tracing::debug!(status = response.status, "eventstore returned no resource");
        return Ok(EventstoreResult::empty(response.status));
    }
    let ety: EventstoreEntity<T> = serde_json::from_str(&response.body).map_err(Error::Deserialization)?;
    Ok(EventstoreResult::found(response.status, ety))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Person {
        firstname: String,
        lastname: String,
    }

    fn requests() -> EventstoreRequests {
        EventstoreRequests::new("http://localhost:5600")
    }

    fn person() -> Person {
        Person {
            firstname: "Hello".to_string(),
            lastname: "World".to_string(),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const ENVELOPE: &str = r#"{"id":"p1","version":3,"data":{"firstname":"Hello","lastname":"World"}}"#;

    #[test]
    fn build_add_produces_correct_request() {
        let req = requests().build_add("people", "p1", &person()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5600/eventstores/people/entities/p1");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], "p1");
        assert_eq!(body["version"], 0);
        assert_eq!(body["data"]["firstname"], "Hello");
    }

    #[test]
    fn build_save_uses_put() {
        let req = requests().build_save("people", "p1", &person()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:5600/eventstores/people/entities/p1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["version"], 0);
    }

    #[test]
    fn build_get_has_no_body() {
        let req = requests().build_get("people", "p1").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5600/eventstores/people/entities/p1");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_by_version_appends_query() {
        let req = requests().build_get_by_version("people", "p1", 4).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:5600/eventstores/people/entities/p1?version=4"
        );
    }

    #[test]
    fn empty_storename_is_rejected_first() {
        let err = requests().build_add("", "", &person()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "storename" }));
    }

    #[test]
    fn empty_id_is_rejected() {
        for err in [
            requests().build_add("people", "", &person()).unwrap_err(),
            requests().build_save("people", "", &person()).unwrap_err(),
            requests().build_get("people", "").unwrap_err(),
            requests().build_get_by_version("people", "", 1).unwrap_err(),
        ] {
            assert!(matches!(err, Error::InvalidArgument { name: "id" }));
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let requests = EventstoreRequests::new("http://localhost:5600/");
        let req = requests.build_get("people", "p1").unwrap();
        assert_eq!(req.url, "http://localhost:5600/eventstores/people/entities/p1");
    }

    #[test]
    fn path_segments_are_escaped() {
        let req = requests().build_get("order items", "john doe/1").unwrap();
        assert_eq!(
            req.url,
            "http://localhost:5600/eventstores/order%20items/entities/john%20doe%2F1"
        );
    }

    #[test]
    fn envelope_keeps_the_raw_id() {
        let req = requests().build_add("people", "john doe", &person()).unwrap();
        assert!(req.url.ends_with("/entities/john%20doe"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], "john doe");
    }

    #[test]
    fn endpoint_path_prefix_is_kept() {
        let requests = EventstoreRequests::new("http://gateway:8080/store-api/");
        let req = requests.build_get_by_version("people", "p1", 2).unwrap();
        assert_eq!(
            req.url,
            "http://gateway:8080/store-api/eventstores/people/entities/p1?version=2"
        );
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let err = EventstoreRequests::new("not a url").build_get("people", "p1").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "endpoint" }));
    }

    #[test]
    fn pretty_option_indents_body() {
        let requests = EventstoreRequests::with_json_options(
            "http://localhost:5600",
            JsonOptions { pretty: true },
        );
        let req = requests.build_add("people", "p1", &person()).unwrap();
        assert!(req.body.unwrap().contains('\n'));
    }

    #[test]
    fn parse_add_created() {
        let result: EventstoreResult<Person> = requests().parse_add(response(201, ENVELOPE)).unwrap();
        assert_eq!(result.status_code, 201);
        assert_eq!(result.version, 3);
        assert_eq!(result.resource, Some(person()));
    }

    #[test]
    fn parse_add_requires_exactly_created() {
        let result: EventstoreResult<Person> = requests().parse_add(response(200, ENVELOPE)).unwrap();
        assert_eq!(result.status_code, 200);
        assert!(result.resource.is_none());
        assert_eq!(result.version, 0);
    }

    #[test]
    fn parse_add_server_error_is_empty_result() {
        let result: EventstoreResult<Person> = requests().parse_add(response(500, "")).unwrap();
        assert_eq!(result.status_code, 500);
        assert!(result.resource.is_none());
    }

    #[test]
    fn parse_save_ok() {
        let result: EventstoreResult<Person> = requests().parse_save(response(200, ENVELOPE)).unwrap();
        assert_eq!(result.version, 3);
        assert!(result.is_success());
    }

    #[test]
    fn parse_save_requires_exactly_ok() {
        let result: EventstoreResult<Person> = requests().parse_save(response(201, ENVELOPE)).unwrap();
        assert_eq!(result.status_code, 201);
        assert!(result.resource.is_none());
    }

    #[test]
    fn parse_save_conflict() {
        let result: EventstoreResult<Person> = requests().parse_save(response(409, "")).unwrap();
        assert_eq!(result.status_code, 409);
        assert!(result.resource.is_none());
    }

    #[test]
    fn parse_get_accepts_any_2xx() {
        let result: EventstoreResult<Person> = requests().parse_get(response(203, ENVELOPE)).unwrap();
        assert_eq!(result.status_code, 203);
        assert_eq!(result.resource, Some(person()));
    }

    #[test]
    fn parse_get_not_found() {
        let result: EventstoreResult<Person> = requests().parse_get(response(404, "")).unwrap();
        assert_eq!(result.status_code, 404);
        assert!(result.resource.is_none());
    }

    #[test]
    fn parse_get_by_version_not_found() {
        let result: EventstoreResult<Person> =
            requests().parse_get_by_version(response(404, "")).unwrap();
        assert_eq!(result.status_code, 404);
        assert!(result.resource.is_none());
    }

    #[test]
    fn parse_get_bad_json() {
        let err = requests()
            .parse_get::<Person>(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }
}
