//! Best-effort visit log.
//!
//! Every request is described by a [`VisitMetadata`] that is pushed onto a
//! bounded [`VisitQueue`]. A single writer task drains the queue into a
//! [`VisitRecorder`], so at most one visit write is in flight at a time. The
//! request never waits for the recorder and never sees its errors; when the
//! queue is full the visit is dropped.

use std::{future::Future, net::SocketAddr, pin::Pin, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use sea_orm::{DatabaseConnection, DbErr};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::store::visit::{record_visit, VisitMetadata};

pub type RecordFuture = Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'static>>;

pub trait VisitRecorder: Send + Sync {
    fn record(&self, visit: VisitMetadata) -> RecordFuture;
}

/// Writes visits into the `visit` table.
#[derive(Clone)]
pub struct DbVisitRecorder {
    db: DatabaseConnection,
}

impl DbVisitRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        DbVisitRecorder { db }
    }
}

impl VisitRecorder for DbVisitRecorder {
    fn record(&self, visit: VisitMetadata) -> RecordFuture {
        let db = self.db.clone();
        Box::pin(async move { record_visit(&db, visit).await.map(|_| ()) })
    }
}

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Sending half of the visit log. Cloned into the middleware.
#[derive(Clone)]
pub struct VisitQueue {
    sender: mpsc::Sender<VisitMetadata>,
}

impl VisitQueue {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn(recorder: Arc<dyn VisitRecorder>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<VisitMetadata>(capacity.max(1));
        tokio::spawn(async move {
            while let Some(visit) = receiver.recv().await {
                let path = visit.path.clone();
                if let Err(err) = recorder.record(visit).await {
                    warn!(path = %path, error = %err, "Failed to record visit");
                }
            }
            debug!("Visit queue closed");
        });
        VisitQueue { sender }
    }

    /// Enqueues without waiting; returns `false` when the visit was dropped.
    pub fn push(&self, visit: VisitMetadata) -> bool {
        match self.sender.try_send(visit) {
            Ok(()) => true,
            Err(TrySendError::Full(visit)) => {
                warn!(path = %visit.path, "Visit queue full, visit dropped");
                false
            }
            Err(TrySendError::Closed(visit)) => {
                debug!(path = %visit.path, "Visit queue closed");
                false
            }
        }
    }
}

pub async fn visit_middleware(
    State(queue): State<VisitQueue>,
    req: Request,
    next: Next,
) -> Response {
    queue.push(visit_metadata(&req));
    next.run(req).await
}

pub fn visit_metadata(req: &Request) -> VisitMetadata {
    let headers = req.headers();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    VisitMetadata {
        ip_address: forwarded_for(headers)
            .or(peer)
            .unwrap_or_else(|| "unknown".to_string()),
        user_agent: header_value(headers, header::USER_AGENT.as_str()).unwrap_or_default(),
        url: full_url(req),
        referrer: header_value(headers, header::REFERER.as_str()),
        path: req.uri().path().to_string(),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(str::to_string)
}

fn full_url(req: &Request) -> String {
    let uri = req.uri();
    if uri.authority().is_some() {
        return uri.to_string();
    }
    let headers = req.headers();
    let scheme = header_value(headers, "x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    match header_value(headers, header::HOST.as_str()) {
        Some(host) => format!("{scheme}://{host}{path_and_query}"),
        None => path_and_query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn visit(path: &str) -> VisitMetadata {
        VisitMetadata {
            ip_address: "127.0.0.1".to_string(),
            user_agent: String::new(),
            url: path.to_string(),
            referrer: None,
            path: path.to_string(),
        }
    }

    #[derive(Default)]
    struct Collecting {
        paths: Mutex<Vec<String>>,
        recorded: Notify,
    }

    impl VisitRecorder for Arc<Collecting> {
        fn record(&self, visit: VisitMetadata) -> RecordFuture {
            let this = Arc::clone(self);
            Box::pin(async move {
                this.paths.lock().unwrap().push(visit.path);
                this.recorded.notify_one();
                Ok(())
            })
        }
    }

    struct Stuck;

    impl VisitRecorder for Stuck {
        fn record(&self, _visit: VisitMetadata) -> RecordFuture {
            Box::pin(std::future::pending::<Result<(), DbErr>>())
        }
    }

    #[tokio::test]
    async fn writer_records_in_order() {
        let collecting = Arc::new(Collecting::default());
        let queue = VisitQueue::spawn(Arc::new(Arc::clone(&collecting)), 8);

        assert!(queue.push(visit("/")));
        assert!(queue.push(visit("/menu")));
        while collecting.paths.lock().unwrap().len() < 2 {
            collecting.recorded.notified().await;
        }
        assert_eq!(*collecting.paths.lock().unwrap(), vec!["/", "/menu"]);
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_waiting() {
        let queue = VisitQueue::spawn(Arc::new(Stuck), 1);

        // The writer takes the first visit and hangs on it forever.
        assert!(queue.push(visit("/a")));
        tokio::task::yield_now().await;
        let mut accepted = 0;
        for _ in 0..4 {
            if queue.push(visit("/b")) {
                accepted += 1;
            }
        }
        assert!(accepted <= 1);
    }

    #[test]
    fn collects_headers() {
        let req = Request::builder()
            .uri("/menu?category=makanan-ab12")
            .header(header::HOST, "catering.test")
            .header(header::USER_AGENT, "curl/8.0")
            .header(header::REFERER, "https://search.test/")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        let visit = visit_metadata(&req);
        assert_eq!(visit.ip_address, "203.0.113.7");
        assert_eq!(visit.user_agent, "curl/8.0");
        assert_eq!(visit.url, "http://catering.test/menu?category=makanan-ab12");
        assert_eq!(visit.referrer.as_deref(), Some("https://search.test/"));
        assert_eq!(visit.path, "/menu");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut req = Request::builder()
            .uri("/gallery")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 5555))));

        let visit = visit_metadata(&req);
        assert_eq!(visit.ip_address, "192.0.2.1");
        assert_eq!(visit.user_agent, "");
        assert_eq!(visit.referrer, None);
        assert_eq!(visit.url, "/gallery");
    }
}
