use std::path::{Path, PathBuf};

use opentelemetry_tide::TideExt;
use structopt::StructOpt;

pub mod models;
pub mod store;
pub mod telemetry;
pub mod web;

#[derive(Clone, Debug)]
pub struct State {
    pub pictures: store::SharedStore,
}

impl State {
    pub fn new(store: store::PictureStore) -> Self {
        State {
            pictures: store.shared(),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    DataLoadError(PathBuf, store::LoadError),
    TelemetryInitError(anyhow::Error),
    ListenError(std::io::Error),
}

impl From<Error> for u8 {
    fn from(error: Error) -> u8 {
        match error {
            Error::DataLoadError(..) => 3,
            Error::TelemetryInitError(_) => 4,
            Error::ListenError(_) => 5,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DataLoadError(path, err) => {
                write!(f, "Failed to load {}: {}", path.display(), err)?;
                if let Some(source) = std::error::Error::source(err) {
                    write!(f, ": {}", source)?;
                }
                Ok(())
            },
            Error::TelemetryInitError(err) => {
                write!(f, "Failed to init telemetry: {}", err)
            },
            Error::ListenError(err) => {
                write!(f, "Failed to start HTTP server: {}", err)
            },
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct Args {
    /// Host address to bind to.
    #[structopt(long, default_value = "localhost", env = "PICTURE_STORE_BIND_ADDRESS")]
    address: String,
    /// Port to bind to.
    #[structopt(long, default_value = "8080", env = "PICTURE_STORE_BIND_PORT")]
    port: u16,

    /// Path to the JSON array of pictures loaded at startup.
    ///
    /// Defaults to data/pictures.json next to the crate manifest.
    #[structopt(long, parse(from_os_str), env = "PICTURE_STORE_DATA_PATH")]
    data_path: Option<PathBuf>,
}

impl Args {
    pub fn data_path(&self) -> PathBuf {
        match &self.data_path {
            Some(path) => path.clone(),
            None => Path::new(env!("CARGO_MANIFEST_DIR")).join("data/pictures.json"),
        }
    }
}

/// Builds the HTTP server with every route mounted on the given state.
pub fn server(state: State) -> tide::Server<State> {
    let mut app = tide::with_state(state);
    web::mount(&mut app);
    app
}

pub async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::from_args();

    telemetry::init().map_err(Error::TelemetryInitError)?;

    let data_path = args.data_path();
    let store = store::load(&data_path)
        .await
        .map_err(|err| Error::DataLoadError(data_path.clone(), err))?;

    let mut app = server(State::new(store));

    app.with_default_tracing_middleware();

    let address: &str = args.address.as_ref();
    tracing::info!(address, port = args.port, "Starting picture store");
    app.listen((address, args.port))
        .await
        .map_err(Error::ListenError)?;

    Ok(())
}
