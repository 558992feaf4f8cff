/// File-server hit counting
///
/// Wraps the static `/app` scope and counts every request that reaches it.
/// The counter is application state handed in at construction, not a global.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct HitCounter(AtomicU64);

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn hits(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

pub struct FileServerHits {
    counter: web::Data<HitCounter>,
}

impl FileServerHits {
    pub fn new(counter: web::Data<HitCounter>) -> Self {
        Self { counter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for FileServerHits
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = FileServerHitsService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(FileServerHitsService {
            service: Rc::new(service),
            counter: self.counter.clone(),
        }))
    }
}

pub struct FileServerHitsService<S> {
    service: Rc<S>,
    counter: web::Data<HitCounter>,
}

impl<S, B> Service<ServiceRequest> for FileServerHitsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let hits = self.counter.record();
        tracing::trace!(hits, "File server hit");

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
