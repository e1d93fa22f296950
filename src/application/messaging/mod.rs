//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod middleware;
pub mod parser;

pub use dispatcher::{MessageDispatcher, Outcome};
pub use middleware::{AdminMiddleware, Context, LoggingMiddleware, Middleware, MiddlewareChain, ScopeMiddleware};
pub use parser::MessageParser;
