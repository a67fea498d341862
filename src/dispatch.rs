//! Dispatch entry point: where a transport hands a request to the router.

use std::sync::Arc;

use tracing::debug;

use crate::error::RouteError;
use crate::path::Params;
use crate::router::Router;
use crate::sink::Sinks;
use crate::source::{Headers, Source};

/// Top of the routing stack: one root [`Router`] and the sinks every
/// request ends up in.
///
/// Transports call [`dispatch`](Dispatcher::dispatch) once per inbound
/// request. The dispatcher is read-only and can be shared behind an `Arc`.
#[derive(Debug)]
pub struct Dispatcher<S> {
    router: Router<S>,
    sinks: Sinks<S>,
}

impl<S> Dispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(router: Router<S>, sinks: Sinks<S>) -> Self {
        Self { router, sinks }
    }

    /// Routes one request.
    ///
    /// A request without a `:path` header, or with an empty one, fails with
    /// [`MissingPath`](crate::ErrorKind::MissingPath) before any route is
    /// looked at.
    pub fn dispatch(&self, stream: S, headers: Headers, flags: u32) {
        let source = Arc::new(Source::new(stream, headers, flags));

        let Some(path) = source.path().filter(|p| !p.is_empty()).map(str::to_owned) else {
            debug!("request without :path");
            self.sinks.error(RouteError::missing_path(), source.stream.clone());
            return;
        };

        self.router.process(&path, Params::new(), &self.sinks, source);
    }

    pub fn router(&self) -> &Router<S> {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::chain;
    use crate::chain::Next;
    use crate::error::ErrorKind;
    use crate::request::Request;
    use crate::sink::{Completion, Failure};
    use crate::source::{METHOD, PATH};

    /// Stream stand-in that records what the sinks did with it.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    fn dispatcher(router: Router<Recorder>) -> Dispatcher<Recorder> {
        Dispatcher::new(
            router,
            Sinks::new(
                |c: Completion<Recorder>| c.stream.0.lock().unwrap().push(format!("end {}", c.message.unwrap_or_default())),
                |f: Failure<Recorder>| f.stream.0.lock().unwrap().push(format!("fail {} {}", f.error.kind(), f.error)),
            ),
        )
    }

    fn hello(req: Request<Recorder>, next: Next<Recorder>) {
        let name = req.param("name").unwrap_or("world").to_owned();
        next.complete_with(format!("hello {name}"))
    }

    #[test]
    fn dispatches_to_matching_route() {
        let d = dispatcher(Router::new().get("/hello/{name}", chain![hello]));
        let stream = Recorder::default();

        d.dispatch(stream.clone(), Headers::new().with(METHOD, "GET").with(PATH, "/hello/ada"), 0);
        assert_eq!(stream.events(), ["end hello ada"]);
    }

    #[test]
    fn missing_path_fails_before_routing() {
        let d = dispatcher(Router::new().mount("/", chain![hello]));
        let stream = Recorder::default();

        d.dispatch(stream.clone(), Headers::new().with(METHOD, "GET"), 0);
        assert_eq!(stream.events(), [format!("fail {} :path missing", ErrorKind::MissingPath)]);
    }

    #[test]
    fn empty_path_counts_as_missing() {
        let d = dispatcher(Router::new().mount("/", chain![hello]));
        let stream = Recorder::default();

        d.dispatch(stream.clone(), Headers::new().with(METHOD, "GET").with(PATH, ""), 0);
        assert_eq!(stream.events(), [format!("fail {} :path missing", ErrorKind::MissingPath)]);
    }

    #[test]
    fn unmatched_path_is_not_found() {
        let d = dispatcher(Router::new().get("/hello/{name}", chain![hello]));
        let stream = Recorder::default();

        d.dispatch(stream.clone(), Headers::new().with(METHOD, "GET").with(PATH, "/bye"), 0);
        assert_eq!(stream.events(), ["fail NotFound Not found"]);
    }
}
