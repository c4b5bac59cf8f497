//! # hwv-server
//!
//! HTTP boundary for the hardware survey service.
//!
//! | route                               | success            | failure                    |
//! |-------------------------------------|--------------------|----------------------------|
//! | `GET /api/submission-schema`        | 200, schema        |                            |
//! | `POST /api/submission`              | 200, id string     | 400, `{field: [messages]}` |
//! | `POST /api/submission/recalc`       | 200, empty         | 500                        |
//! | `GET /api/submission/single?id=`    | 200, submission    | 404, 400 without `id`      |
//! | `GET /api/submission?deviceId=`     | 200, display rows  | 400 without `deviceId`     |

pub mod api;
pub mod error;
pub mod scheduler;
pub mod server;

pub use api::{ApiResponse, handle};
pub use error::ServerError;
pub use scheduler::spawn_recalc_timer;
pub use server::{HttpServer, ShutdownHandle};
