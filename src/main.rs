mod catalog;
mod config;
mod error;
mod mpris;
mod output;
mod player;
mod position;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
