//! External tool pipelines and their execution.

pub mod chain;
pub mod invoker;

pub use chain::Stage;
pub use chain::ToolChain;
pub use chain::quote_arg;
pub use invoker::InvokeError;
pub use invoker::ToolInvoker;
