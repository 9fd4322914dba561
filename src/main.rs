//! Storefront CLI

use std::{
    fmt::Display,
    io::{self, Write},
    process::ExitCode,
};

use storefront::{
    config::StoreConfig, console::Console, observability, storefront::Storefront,
};
use tracing::error;

fn main() -> ExitCode {
    let config = match StoreConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = observability::init(&config) {
        return fail(&error);
    }

    let mut shop = match Storefront::from_config(&config) {
        Ok(shop) => shop,
        Err(error) => {
            error!(%error, "failed to start storefront");
            return fail(&error);
        }
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock(), io::stderr().lock());

    if let Err(error) = console.run(&mut shop) {
        error!(%error, "console session failed");
        return fail(&error);
    }

    ExitCode::SUCCESS
}

fn fail(error: &impl Display) -> ExitCode {
    // Nothing useful to do if stderr is gone too.
    _ = writeln!(io::stderr(), "{error}");

    ExitCode::FAILURE
}
