use crate::error::AppError;
use serde::de::DeserializeOwned;

/// Load a service's typed settings from its `config/base.yaml` plus
/// `APP__`-prefixed environment overrides.
///
/// Works both when invoked from the workspace root and from inside the
/// service directory, so `cargo run -p <service>` behaves the same either way.
pub fn load_settings<T: DeserializeOwned>(service_dir: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let configuration_directory = if base_path.ends_with(service_dir) {
        base_path.join("config")
    } else {
        base_path.join(service_dir).join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
