pub mod driver;
pub mod encode;
pub mod server;
pub mod textfile;

pub use driver::run;
pub use encode::encode_snapshot;
