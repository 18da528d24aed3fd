//! Session lifecycle and scoped usage against an in-memory directory

mod common;

use common::{params, tls_params, MockServer, Step, GROUP_DN, USER_DN};
use ldap_membership::connection::{with_session, SessionState};
use ldap_membership::protocol::ResultCode;
use ldap_membership::{ConnectionParameters, Error, Session};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_open_and_close() {
    let server = MockServer::new().with_group(GROUP_DN, [USER_DN]);
    let cancel = CancellationToken::new();

    let mut session = Session::open(server.directory(), &tls_params(), &cancel)
        .await
        .expect("open");
    assert_eq!(session.state(), SessionState::Bound);
    assert!(session.tls_active());

    let entry = session.read(GROUP_DN, &["member"], &cancel).await.unwrap();
    assert_eq!(entry.dn, GROUP_DN);
    assert_eq!(entry.get("member").unwrap().to_vec(), vec![USER_DN.to_string()]);

    session.close().await;

    let calls = server.calls();
    assert_eq!(calls.stop_tls, 1);
    assert_eq!(calls.disconnect, 1);
}

#[tokio::test]
async fn test_read_errors_are_directory_errors() {
    let server = MockServer::new();
    let cancel = CancellationToken::new();

    let mut session = Session::open(server.directory(), &params(), &cancel)
        .await
        .unwrap();
    let err = session.read(GROUP_DN, &["member"], &cancel).await.unwrap_err();
    session.close().await;

    assert!(matches!(err, Error::Directory(_)));
    assert_eq!(err.result_code(), Some(ResultCode::NoSuchObject));
}

#[tokio::test]
async fn test_with_session_returns_op_result_and_tears_down() {
    let server = MockServer::new().with_group(GROUP_DN, Vec::<String>::new());
    let cancel = CancellationToken::new();
    let op_cancel = cancel.clone();

    with_session(server.directory(), &params(), &cancel, move |session| {
        Box::pin(async move {
            session
                .modify_add(GROUP_DN, "member", USER_DN, &op_cancel)
                .await
        })
    })
    .await
    .unwrap();

    assert_eq!(server.members(GROUP_DN).unwrap(), vec![USER_DN.to_string()]);
    assert_eq!(server.calls().disconnect, 1);
}

#[tokio::test]
async fn test_with_session_keeps_op_error() {
    let server = MockServer::new()
        .with_group(GROUP_DN, [USER_DN])
        .fail_at(Step::Disconnect, ResultCode::ServerDown, "");
    let cancel = CancellationToken::new();
    let op_cancel = cancel.clone();

    let err = with_session(server.directory(), &params(), &cancel, move |session| {
        Box::pin(async move {
            session
                .modify_add(GROUP_DN, "member", USER_DN, &op_cancel)
                .await
        })
    })
    .await
    .unwrap_err();

    assert_eq!(err.result_code(), Some(ResultCode::AttributeOrValueExists));
    assert_eq!(server.calls().disconnect, 1);
}

#[tokio::test]
async fn test_open_failure_is_torn_down_once() {
    let server = MockServer::new().fail_at(Step::Bind, ResultCode::InvalidCredentials, "");

    let err = Session::open(server.directory(), &tls_params(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
    let calls = server.calls();
    assert_eq!(calls.stop_tls, 1);
    assert_eq!(calls.disconnect, 1);
}

#[test]
fn test_open_rejects_missing_credentials() {
    let server = MockServer::new();
    let params = ConnectionParameters::builder("127.0.0.1").build();

    let err = tokio_test::block_on(Session::open(
        server.directory(),
        &params,
        &CancellationToken::new(),
    ))
    .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(server.calls().connect, 0);
    assert_eq!(server.calls().disconnect, 0);
}
