// Integration tests for `DnacClient` against a wiremock controller.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sgtpolicy_api::{AuthScheme, Credentials, DeployVerify, DnacClient, Error};

const TICKET: &str = "ST-2782-abcdefgh-cas";

// ── Helpers ─────────────────────────────────────────────────────────

fn envelope(response: serde_json::Value) -> serde_json::Value {
    json!({ "response": response, "version": "1.0" })
}

fn task_ref(id: &str) -> serde_json::Value {
    envelope(json!({ "taskId": id, "url": format!("/api/v1/task/{id}") }))
}

fn finished_task(id: &str) -> serde_json::Value {
    envelope(json!({
        "id": id,
        "isError": false,
        "progress": "TASK_CFS_PROVISION",
        "startTime": 1_700_000_000_000_i64,
        "endTime": 1_700_000_000_400_i64,
    }))
}

async fn mount_ticket_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/ticket"))
        .and(body_partial_json(json!({ "username": "admin" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "serviceTicket": TICKET }))),
        )
        .mount(server)
        .await;
}

async fn mount_task_done(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/task/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_task(id)))
        .mount(server)
        .await;
}

async fn setup() -> (MockServer, DnacClient) {
    let server = MockServer::start().await;
    mount_ticket_login(&server).await;
    let client = DnacClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        AuthScheme::Ticket,
        Credentials::new("admin", "secret"),
    );
    (server, client)
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn ticket_auth_headers_are_sent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(header("X-Auth-Token", TICKET))
        .and(header("X-CSRF-Token", "soon-enabled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "sg-1", "name": "Employees", "securityGroupTag": 4 }
        ]))))
        .mount(&server)
        .await;

    let groups = client.list_security_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Employees");
    assert_eq!(groups[0].security_group_tag, 4);
    assert!(client.is_connected());
}

#[tokio::test]
async fn login_happens_once_per_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ticket"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "serviceTicket": TICKET }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let client = DnacClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        AuthScheme::Ticket,
        Credentials::new("admin", "secret"),
    );

    client.list_security_groups().await.unwrap();
    client.list_security_groups().await.unwrap();
}

#[tokio::test]
async fn rejected_login_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ticket"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let client = DnacClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        AuthScheme::Ticket,
        Credentials::new("admin", "wrong"),
    );

    let err = client.connect().await.unwrap_err();
    assert!(err.is_auth_expired(), "got {err}");
    assert!(!client.is_connected());
}

#[tokio::test]
async fn mid_session_401_maps_to_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_security_groups().await.unwrap_err();
    assert!(err.is_auth_expired(), "got {err}");
}

#[tokio::test]
async fn server_errors_carry_status_and_are_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.list_security_groups().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }), "got {err}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn jwt_login_uses_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/v1/identitymgmt/login"))
        // "admin:secret" base64-encoded
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = DnacClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        AuthScheme::JwtCookie,
        Credentials::new("admin", "secret"),
    );

    client.connect().await.unwrap();
    assert!(client.is_connected());
}

// ── Security groups ─────────────────────────────────────────────────

#[tokio::test]
async fn create_security_group_attaches_default_vn() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(body_partial_json(json!([{
            "name": "Engineering",
            "scalableGroupType": "USER_DEVICE",
            "securityGroupTag": 1234,
        }])))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-create")))
        .mount(&server)
        .await;
    mount_task_done(&server, "t-create").await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(query_param("name", "Engineering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "sg-eng", "name": "Engineering", "securityGroupTag": 1234 }
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/virtualnetworkcontext"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "vn-default", "name": "DEFAULT_VN", "scalableGroup": [] }
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/data/customer-facing-service/virtualnetworkcontext"))
        .and(body_partial_json(json!([{
            "id": "vn-default",
            "scalableGroup": [{ "idRef": "sg-eng" }],
        }])))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-vn")))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-vn").await;

    client
        .create_security_group("Engineering", 1234, "eng users", &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn attaching_to_unknown_vn_fails_verification() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(query_param("name", "Engineering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "sg-eng", "name": "Engineering", "securityGroupTag": 1234 }
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/virtualnetworkcontext"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "vn-default", "name": "DEFAULT_VN", "scalableGroup": [] }
        ]))))
        .mount(&server)
        .await;

    let err = client
        .add_to_virtual_networks("Engineering", &["NoSuchVN".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Verification { .. }), "got {err}");
}

#[tokio::test]
async fn delete_security_group_soft_deletes_via_put() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(query_param("name", "Quarantine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "sg-q", "name": "Quarantine", "securityGroupTag": 255 }
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .and(body_partial_json(json!([{ "id": "sg-q", "isDeleted": true }])))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-del")))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-del").await;

    client.delete_security_group_by_name("Quarantine").await.unwrap();
}

#[tokio::test]
async fn missing_group_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let err = client.security_group_id_by_name("Ghost").await.unwrap_err();
    assert!(err.is_not_found(), "got {err}");
}

#[tokio::test]
async fn group_count_comes_from_the_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/api/v2/data/customer-facing-service/summary/scalablegroup/access",
        ))
        .and(query_param("scalableGroupSummary", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "totalSGCount": 42 }
        ]))))
        .mount(&server)
        .await;

    assert_eq!(client.security_group_count().await.unwrap(), 42);
}

#[tokio::test]
async fn fetch_by_uuid_unwraps_the_single_element_list() {
    let (server, client) = setup().await;

    // The by-uuid endpoints wrap the single object in a list.
    Mock::given(method("GET"))
        .and(path(
            "/api/v2/data/customer-facing-service/scalablegroup/access/sg-uuid-1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "sg-uuid-1", "name": "Quarantine", "securityGroupTag": 1100 }
        ]))))
        .mount(&server)
        .await;

    let group = client.get_security_group("sg-uuid-1").await.unwrap();
    assert_eq!(group.name, "Quarantine");
    assert_eq!(group.security_group_tag, 1100);
}

// ── Task polling ────────────────────────────────────────────────────

#[tokio::test]
async fn wait_for_task_polls_until_end_time_appears() {
    let (server, client) = setup().await;

    // First poll: still running. Second poll onwards: finished.
    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-slow",
            "isError": false,
            "progress": "CFS in progress",
            "startTime": 1_700_000_000_000_i64,
        }))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-slow").await;

    let status = client.get_task("t-slow").await.unwrap();
    assert!(!status.is_complete());

    let done = client
        .wait_for_task(
            &serde_json::from_value(json!({ "taskId": "t-slow" })).unwrap(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();
    assert!(done.is_success());
    assert!(done.ended_at().is_some());
}

#[tokio::test]
async fn failed_task_surfaces_the_failure_reason() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/data/customer-facing-service/contract/access"))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-bad")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-bad",
            "isError": true,
            "failureReason": "NCCF10270: contract name already in use",
            "startTime": 1_700_000_000_000_i64,
            "endTime": 1_700_000_000_100_i64,
        }))))
        .mount(&server)
        .await;

    let contract = sgtpolicy_api::models::AccessContract::new("dup", "", vec![]);
    let err = client.create_contract(&contract).await.unwrap_err();
    match err {
        Error::TaskFailed { task_id, reason } => {
            assert_eq!(task_id, "t-bad");
            assert!(reason.contains("NCCF10270"));
        }
        other => panic!("expected TaskFailed, got {other}"),
    }
}

#[tokio::test]
async fn task_that_never_finishes_times_out() {
    let (server, client) = setup().await;

    // No endTime, no error flag: the task never reaches a terminal state.
    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-stuck",
            "isError": false,
            "progress": "CFS in progress",
            "startTime": 1_700_000_000_000_i64,
        }))))
        .mount(&server)
        .await;

    let err = client
        .wait_for_task(
            &serde_json::from_value(json!({ "taskId": "t-stuck" })).unwrap(),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
    match err {
        Error::TaskTimeout { task_id, .. } => assert_eq!(task_id, "t-stuck"),
        other => panic!("expected TaskTimeout, got {other}"),
    }
}

#[tokio::test]
async fn batch_wait_continues_past_a_failure_and_aggregates_it() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-broken",
            "isError": true,
            "failureReason": "NCSG10001: tag already in use",
            "startTime": 1_700_000_000_000_i64,
            "endTime": 1_700_000_000_100_i64,
        }))))
        .mount(&server)
        .await;
    mount_task_done(&server, "t-ok").await;

    let tasks: Vec<sgtpolicy_api::models::TaskReference> = serde_json::from_value(json!([
        { "taskId": "t-broken" },
        { "taskId": "t-ok" }
    ]))
    .unwrap();

    // The second task is still waited on, then the failure surfaces.
    let err = client
        .wait_for_tasks(&tasks, Duration::from_secs(30))
        .await
        .unwrap_err();
    match err {
        Error::Verification { message } => {
            assert!(message.contains("1 of 2"), "message: {message}");
            assert!(message.contains("NCSG10001"), "message: {message}");
        }
        other => panic!("expected Verification, got {other}"),
    }
}

#[tokio::test]
async fn task_wait_retries_through_a_transient_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("gateway busy"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-flaky").await;

    let done = client
        .wait_for_task_with_retries(
            &serde_json::from_value(json!({ "taskId": "t-flaky" })).unwrap(),
            Duration::from_secs(30),
            2,
        )
        .await
        .unwrap();
    assert!(done.is_success());
}

#[tokio::test]
async fn cfs_wait_looks_for_the_complete_marker_in_the_tree() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-cfs/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {
                "id": "t-cfs",
                "isError": false,
                "startTime": 1_700_000_000_000_i64,
            },
            {
                "id": "t-cfs-child",
                "isError": false,
                "data": "cfs_id=42;processcfs_complete=true",
                "startTime": 1_700_000_000_000_i64,
            }
        ]))))
        .mount(&server)
        .await;

    client
        .wait_for_cfs_complete(&serde_json::from_value(json!({ "taskId": "t-cfs" })).unwrap())
        .await
        .unwrap();
}

// ── Contracts ───────────────────────────────────────────────────────

#[tokio::test]
async fn contract_names_and_count_come_from_the_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/api/v2/data/customer-facing-service/summary/contract/access",
        ))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "5000"))
        .and(query_param("contractSummary", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "acaContractSummary": [
                { "name": "Permit IP" },
                { "name": "Deny IP" },
                { "name": "web-only" },
            ],
            "totalContractCount": 3,
        }]))))
        .mount(&server)
        .await;

    let names = client.contract_names().await.unwrap();
    assert_eq!(names, vec!["Permit IP", "Deny IP", "web-only"]);
    assert_eq!(client.contract_count().await.unwrap(), 3);

    client
        .check_contracts(&["web-only".into()], true)
        .await
        .unwrap();
    let err = client
        .check_contracts(&["web-only".into()], false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Verification { .. }));
}

#[tokio::test]
async fn delete_contract_posts_a_delete_list_intent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/contract/access"))
        .and(query_param("name", "web-only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "c-web", "name": "web-only", "clause": [] }
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/data/cfs-intent/contract/access"))
        .and(body_json(json!({ "deleteList": ["c-web"] })))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-cdel")))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-cdel").await;

    client.delete_contract("web-only").await.unwrap();
}

// ── Policies ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_policy_resolves_names_and_inherits_scope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/contract/access"))
        .and(query_param("name", "web-only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "id": "c-web", "name": "web-only", "clause": [] }
        ]))))
        .mount(&server)
        .await;

    for (name, id) in [("Engineering", "sg-eng"), ("Servers", "sg-srv")] {
        Mock::given(method("GET"))
            .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                { "id": id, "name": name, "securityGroupTag": 10 }
            ]))))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/policy/access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "id": "pol-0",
            "policyScope": "scope-uuid-1",
            "contract": { "idRef": "c-default" },
            "producer": { "scalableGroup": [{ "idRef": "sg-a" }] },
            "consumer": { "scalableGroup": [{ "idRef": "sg-b" }] },
        }]))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/data/customer-facing-service/policy/access"))
        .and(body_partial_json(json!([{
            "name": "eng-to-srv",
            "policyScope": "scope-uuid-1",
            "priority": 65535,
            "contract": { "idRef": "c-web" },
            "producer": { "scalableGroup": [{ "idRef": "sg-eng" }] },
            "consumer": { "scalableGroup": [{ "idRef": "sg-srv" }] },
        }])))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-pol")))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-pol").await;

    client
        .create_policy("eng-to-srv", "Engineering", "Servers", "web-only")
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_policy_targets_the_matching_producer_consumer_pair() {
    let (server, client) = setup().await;

    for (name, id) in [("Engineering", "sg-eng"), ("Servers", "sg-srv")] {
        Mock::given(method("GET"))
            .and(path("/api/v2/data/customer-facing-service/scalablegroup/access"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                { "id": id, "name": name, "securityGroupTag": 10 }
            ]))))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api/v2/data/customer-facing-service/policy/access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {
                "id": "pol-other",
                "contract": { "idRef": "c-x" },
                "producer": { "scalableGroup": [{ "idRef": "sg-a" }] },
                "consumer": { "scalableGroup": [{ "idRef": "sg-b" }] },
            },
            {
                "id": "pol-target",
                "contract": { "idRef": "c-web" },
                "producer": { "scalableGroup": [{ "idRef": "sg-eng" }] },
                "consumer": { "scalableGroup": [{ "idRef": "sg-srv" }] },
            },
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(
            "/api/v2/data/customer-facing-service/policy/access/pol-target",
        ))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-pdel")))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_done(&server, "t-pdel").await;

    client.delete_policy("Engineering", "Servers").await.unwrap();
}

#[tokio::test]
async fn policy_names_join_producer_and_consumer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/api/v2/data/customer-facing-service/summary/policy/access",
        ))
        .and(query_param("gbpSummary", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "acaGBPSummary": [
                { "producerName": "Engineering", "consumerName": "Servers", "contractName": "web-only" },
                { "producerName": "Guests", "consumerName": "Servers", "contractName": "Deny IP" },
            ],
        }]))))
        .mount(&server)
        .await;

    let names = client.policy_names().await.unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].name, "Engineering-Servers");
    assert_eq!(names[0].contract, "web-only");
    assert_eq!(client.policy_count().await.unwrap(), 2);
}

// ── Deploy ──────────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_accepts_the_requested_status_marker() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/aca-controller-service/deploy"))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-deploy")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-deploy",
            "isError": false,
            "data": "deployStatus=NO_REQUEST_AVAILABLE",
            "startTime": 1_700_000_000_000_i64,
            "endTime": 1_700_000_000_900_i64,
        }))))
        .mount(&server)
        .await;

    client
        .deploy_security_groups(DeployVerify::NoRequest, 1)
        .await
        .unwrap();

    let err = client
        .deploy_security_groups(DeployVerify::Done, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Deploy { .. }), "got {err}");
}

#[tokio::test]
async fn push_requires_a_done_status() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/aca-controller-service/pushSGs"))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_ref("t-push")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t-push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "t-push",
            "isError": false,
            "data": "deployStatus=DONE",
            "startTime": 1_700_000_000_000_i64,
            "endTime": 1_700_000_000_900_i64,
        }))))
        .mount(&server)
        .await;

    client.push_security_groups(DeployVerify::Done).await.unwrap();
}
