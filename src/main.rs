//! rBerichtsheft main entrypoint.

use rberichtsheft::run;
use rberichtsheft::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
