//! Core library for the `briefing` CLI.
//!
//! This crate defines:
//! - Configuration handling (non-secret defaults only)
//! - The wttr.in weather client and report rendering
//! - The built-in joke catalog
//! - The push-notification gateway client
//!
//! It is used by `briefing-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod jokes;
pub mod model;
pub mod notify;
pub mod weather;

pub use config::Config;
pub use error::Error;
pub use model::{DayForecast, HourlyReading, JokeRecord, NotificationRequest, WeatherQuery};
pub use notify::Notifier;
pub use weather::WttrClient;
