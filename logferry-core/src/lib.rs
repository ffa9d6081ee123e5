pub mod cli;
pub mod conf;
pub mod ingest;
pub mod logging;
pub mod record;
pub mod shutdown;
pub mod sink;
pub mod source;
