pub mod config;
pub mod duration;
pub mod error;
pub mod window;

pub use config::{load_dotenv, Config, ConfigOverrides, PushoverConfig};
pub use duration::{parse_duration, parse_time_of_day};
pub use error::ConfigError;
pub use window::EvalWindow;
