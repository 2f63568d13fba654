//! crates/gateway_core/src/summary.rs
//!
//! Drains grouped-count summary streams into a `SummaryMap`.

use futures::StreamExt;
use tracing::debug;

use crate::context::RequestContext;
use crate::domain::{SummaryMap, SummaryRecord};
use crate::ports::{PortError, PortResult, RecordStream, UserDirectory};

/// Reads records until the stream ends and collects them by key.
///
/// The end of the stream is success. Any error in the stream is reported as
/// `Internal` and the records received so far are dropped. A repeated key
/// keeps the last count received.
pub async fn drain(
    ctx: &RequestContext,
    mut records: RecordStream<SummaryRecord>,
) -> PortResult<SummaryMap> {
    let mut summary = SummaryMap::new();
    while let Some(record) = records.next().await {
        let record = record.map_err(|e| match e {
            PortError::Internal(_) => e,
            other => PortError::Internal(other.message().to_string()),
        })?;
        debug!(parent: ctx.span(), key = %record.key, count = record.count, "received summary record");
        summary.insert(record.key, record.count);
    }
    debug!(parent: ctx.span(), records = summary.len(), "received all summary records");
    Ok(summary)
}

/// Replaces user ids with display names. Users sharing a display name have
/// their counts added together. A failed lookup is reported as `Internal`.
pub async fn label_users(
    ctx: &RequestContext,
    users: &dyn UserDirectory,
    by_user_id: SummaryMap,
) -> PortResult<SummaryMap> {
    let mut labelled = SummaryMap::new();
    for (user_id, count) in by_user_id {
        let user = users.find_user_by_id(&user_id).await.map_err(|e| {
            debug!(parent: ctx.span(), user_id = %user_id, error = %e, "user lookup failed");
            PortError::Internal(format!("failed to resolve user {}: {}", user_id, e.message()))
        })?;
        *labelled.entry(user.display_name()).or_insert(0) += count;
    }
    Ok(labelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use async_trait::async_trait;
    use futures::stream;

    fn record(key: &str, count: i64) -> PortResult<SummaryRecord> {
        Ok(SummaryRecord {
            key: key.to_string(),
            count,
        })
    }

    #[tokio::test]
    async fn drains_records_into_map() {
        let records = Box::pin(stream::iter(vec![record("A", 3), record("B", 5)]));

        let summary = drain(&RequestContext::new(), records).await.unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary["A"], 3);
        assert_eq!(summary["B"], 5);
    }

    #[tokio::test]
    async fn empty_stream_is_an_empty_map() {
        let records = Box::pin(stream::iter(Vec::<PortResult<SummaryRecord>>::new()));

        let summary = drain(&RequestContext::new(), records).await.unwrap();

        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn stream_error_discards_partial_result() {
        let records = Box::pin(stream::iter(vec![
            record("A", 3),
            Err(PortError::NotFound("stream reset".to_string())),
            record("B", 5),
        ]));

        let err = drain(&RequestContext::new(), records).await.unwrap_err();

        assert_eq!(err, PortError::Internal("stream reset".to_string()));
    }

    #[tokio::test]
    async fn repeated_key_keeps_last_count() {
        let records = Box::pin(stream::iter(vec![record("A", 3), record("A", 7)]));

        let summary = drain(&RequestContext::new(), records).await.unwrap();

        assert_eq!(summary["A"], 7);
    }

    struct Directory;

    #[async_trait]
    impl UserDirectory for Directory {
        async fn find_user_by_id(&self, id: &str) -> PortResult<User> {
            match id {
                "u1" => Ok(User {
                    phone: "79990000001".to_string(),
                    last_name: Some("Ivanov".to_string()),
                    first_name: Some("Petr".to_string()),
                    middle_name: Some("Sergeevich".to_string()),
                }),
                "anon-1" | "anon-2" => Ok(User {
                    phone: String::new(),
                    last_name: None,
                    first_name: None,
                    middle_name: None,
                }),
                _ => Err(PortError::NotFound(id.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn labels_user_ids_with_display_names() {
        let by_id = SummaryMap::from([("u1".to_string(), 4)]);

        let labelled = label_users(&RequestContext::new(), &Directory, by_id).await.unwrap();

        assert_eq!(labelled["P. S. Ivanov, +79990000001"], 4);
    }

    #[tokio::test]
    async fn users_with_the_same_label_keep_both_counts() {
        let by_id = SummaryMap::from([("anon-1".to_string(), 4), ("anon-2".to_string(), 1)]);

        let labelled = label_users(&RequestContext::new(), &Directory, by_id).await.unwrap();

        assert_eq!(labelled.len(), 1);
        assert_eq!(labelled.values().sum::<i64>(), 5);
    }

    #[tokio::test]
    async fn unknown_user_fails_labelling() {
        let by_id = SummaryMap::from([("u1".to_string(), 4), ("u2".to_string(), 1)]);

        let err = label_users(&RequestContext::new(), &Directory, by_id)
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Internal(_)));
    }
}
