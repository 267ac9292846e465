//! Ordered route table.
//!
//! One list per HTTP method, scanned in registration order. First match
//! wins, so ambiguous patterns are legal and resolved purely by order.
//! Lookup is O(routes for that method); tables are small and built once.
//!
//! Patterns are compared segment by segment. A segment written `:name`
//! captures one non-empty path segment; any other segment must equal the
//! path segment byte for byte. Literal text is never fed to a pattern
//! language, so characters like `.` or `(` in a literal segment carry no
//! special meaning.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A registered route. Immutable once built.
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    param_names: Vec<String>,
    handler: BoxedHandler,
}

impl Route {
    fn compile(pattern: &str, handler: BoxedHandler) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidPattern { pattern: pattern.to_owned(), reason };

        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();
        for raw in pattern.split('/') {
            match raw.strip_prefix(':') {
                Some("") => return Err(invalid("parameter segment without a name")),
                Some(name) if param_names.iter().any(|n| n == name) => {
                    return Err(invalid("duplicate parameter name"));
                }
                Some(name) => {
                    param_names.push(name.to_owned());
                    segments.push(Segment::Param(name.to_owned()));
                }
                None => segments.push(Segment::Literal(raw.to_owned())),
            }
        }

        Ok(Self { pattern: pattern.to_owned(), segments, param_names, handler })
    }

    pub fn pattern(&self) -> &str { &self.pattern }

    /// Parameter names in the order they appear in the pattern.
    pub fn param_names(&self) -> &[String] { &self.param_names }

    /// Binds `path` against this route. `None` if any segment disagrees.
    fn bind(&self, path: &str) -> Option<HashMap<String, String>> {
        let mut parts = path.split('/');
        let mut params = HashMap::with_capacity(self.param_names.len());

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_owned());
                }
            }
        }

        // Leftover path segments mean the path is longer than the pattern.
        match parts.next() {
            Some(_) => None,
            None => Some(params),
        }
    }
}

/// A successful lookup: the handler to run and the bound parameters.
pub struct RouteMatch {
    pub handler: BoxedHandler,
    pub params: HashMap<String, String>,
}

/// The application route table.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` and appends it to `method`'s list.
    ///
    /// `method` must be one of `GET`, `POST`, `PUT`, `PATCH`, `DELETE`.
    pub fn register(&mut self, method: &str, pattern: &str, handler: impl Handler) -> Result<(), Error> {
        let method: Method = method.parse()?;
        self.insert(method, pattern, Arc::new(handler))
    }

    pub(crate) fn insert(&mut self, method: Method, pattern: &str, handler: BoxedHandler) -> Result<(), Error> {
        let route = Route::compile(pattern, handler)?;
        self.routes.entry(method).or_default().push(route);
        Ok(())
    }

    /// First route registered for `method` that accepts `path`.
    pub fn find(&self, method: Method, path: &str) -> Option<RouteMatch> {
        self.routes.get(&method)?
            .iter()
            .find_map(|route| {
                let params = route.bind(path)?;
                Some(RouteMatch { handler: Arc::clone(&route.handler), params })
            })
    }

    /// Routes registered for `method`, in match order.
    pub fn routes(&self, method: Method) -> &[Route] {
        self.routes.get(&method).map(Vec::as_slice).unwrap_or(&[])
    }
}
