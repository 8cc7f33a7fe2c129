mod builder;
mod defaults;
mod file;
mod models;

pub use builder::load_settings;
pub use models::Settings;

#[cfg(test)]
pub use builder::build_settings;
#[cfg(test)]
pub use file::FileConfig;
