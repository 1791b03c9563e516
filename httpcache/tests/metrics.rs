//! Tests for verifying decision metrics.

#![cfg(feature = "metrics")]

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use http::{Request, Response};
use http_body_util::{BodyExt, Empty, Full};
use httpcache::{HttpCache, Transport, format_http_date};
use httpcache_memory::MemoryStore;
use metrics::{SharedString, Unit};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use metrics_util::{CompositeKey, MetricKind};

type Snapshot = Vec<(CompositeKey, Option<Unit>, Option<SharedString>, DebugValue)>;

struct FixedTransport {
    cache_control: &'static str,
}

#[async_trait]
impl Transport<Empty<Bytes>> for FixedTransport {
    type Body = Full<Bytes>;
    type Error = std::convert::Infallible;

    async fn round_trip(
        &self,
        _request: Request<Empty<Bytes>>,
    ) -> Result<Response<Full<Bytes>>, Self::Error> {
        Ok(Response::builder()
            .header("date", format_http_date(Utc::now()))
            .header("cache-control", self.cache_control)
            .body(Full::new(Bytes::from_static(b"counted")))
            .unwrap())
    }
}

fn request() -> Request<Empty<Bytes>> {
    Request::get("http://example.test/counted")
        .body(Empty::new())
        .unwrap()
}

fn counter(snapshot: &Snapshot, name: &str) -> u64 {
    snapshot
        .iter()
        .find(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter && key.key().name() == name
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => *count,
            other => panic!("unexpected metric value {other:?}"),
        })
        .unwrap_or(0)
}

#[test]
fn test_decision_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        // Use single-threaded runtime so all async code runs on same thread as local recorder
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let fresh = HttpCache::new(Arc::new(MemoryStore::new(1024).unwrap()));
            let transport = FixedTransport {
                cache_control: "max-age=60",
            };
            for _ in 0..3 {
                let response = fresh.round_trip(&transport, request()).await.unwrap();
                response.into_body().collect().await.unwrap();
            }

            let stale = HttpCache::new(Arc::new(MemoryStore::new(1024).unwrap()));
            let transport = FixedTransport {
                cache_control: "max-age=0",
            };
            for _ in 0..2 {
                let response = stale.round_trip(&transport, request()).await.unwrap();
                response.into_body().collect().await.unwrap();
            }

            let rejecting = HttpCache::new(Arc::new(MemoryStore::new(8).unwrap()));
            let response = rejecting.round_trip(&transport, request()).await.unwrap();
            response.into_body().collect().await.unwrap();
        });
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter(&snapshot, "httpcache_miss_total"), 3);
    assert_eq!(counter(&snapshot, "httpcache_fresh_total"), 2);
    assert_eq!(counter(&snapshot, "httpcache_stale_total"), 1);
    assert_eq!(counter(&snapshot, "httpcache_store_rejected_total"), 1);
    assert_eq!(counter(&snapshot, "httpcache_revalidated_total"), 0);
}
