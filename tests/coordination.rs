use std::sync::Arc;

use converse::Converse;

mod common;
use common::event_recorder;

/// Two independently spawned components and the test body coordinate through
/// one shared converse: the default key is the "system is ready" barrier, a
/// named key carries a question, and a second named key reports completion.
#[tokio::test]
async fn components_coordinate_through_a_shared_converse() {
    let converse = Arc::new(Converse::<String>::default());
    let (record, drain) = event_recorder();

    let asker = {
        let converse = converse.clone();
        let record = record.clone();
        tokio::spawn(async move {
            record("waiting for system".to_string());
            converse.wait_default().await;
            record("asking the question".to_string());
            converse.signal("question", Some("¿Qué tal?".to_string())).unwrap();
        })
    };

    let answerer = {
        let converse = converse.clone();
        let record = record.clone();
        tokio::spawn(async move {
            let question = converse.wait("question").await;
            record(format!("received {:?}, signaling done", question.unwrap()));
            converse.signal("done", None).unwrap();
        })
    };

    // Let both components run up to their suspension points before the
    // barrier fires; the runtime is single-threaded, so this is deterministic.
    tokio::task::yield_now().await;

    record("system is ready".to_string());
    converse.signal_default().unwrap();
    converse.wait("done").await;
    record("all done".to_string());

    asker.await.unwrap();
    answerer.await.unwrap();

    assert_eq!(drain(), [
        "waiting for system",
        "system is ready",
        "asking the question",
        "received \"¿Qué tal?\", signaling done",
        "all done",
    ]);
}
