pub(crate) mod command;
pub(crate) mod control;
pub(crate) mod status;
pub(crate) mod ui;

pub use self::command::{Args, Command, LogLevel, OutputFormat};
pub use self::control::{
    ColourArgs, DreamArgs, DreamPattern, ModeArgs, PercentageArgs, PowerArgs, PowerState,
};
pub use self::status::WatchArgs;
