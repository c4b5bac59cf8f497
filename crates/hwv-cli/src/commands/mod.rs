pub mod device;
pub mod dispatch;
pub mod get;
pub mod list;
pub mod recalc;
pub mod schema;
pub mod serve;
pub mod submit;
pub mod validate;
