/*!
 * rununiproc-path - Search Mode Entry Point
 *
 *    rununiproc-path <name> [args...]
 *
 * Like rununiproc, but <name> is looked up on the search path with ".exe"
 * appended and the resolved absolute path is what gets launched.
 */

use std::ffi::OsString;

use rununiproc::{init_tracing, run_native, ResolutionMode};

fn main() {
    init_tracing();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    std::process::exit(run_native(ResolutionMode::Search, &args));
}
