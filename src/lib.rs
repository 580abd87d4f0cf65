mod cli;
mod converters;
mod discovery;
mod errors;
mod logger;
mod schema;
mod toml;
mod utils;

use crate::cli::cli;

pub fn main() {
    cli();
}
