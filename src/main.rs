/*!
 * rununiproc - Direct Mode Entry Point
 *
 *    rununiproc <executable> [args...]
 *
 * Runs <executable> (a path, used verbatim) pinned to the lowest CPU this
 * process may use, inheriting only the standard streams, and exits with the
 * child's exit code.
 */

use std::ffi::OsString;

use rununiproc::{init_tracing, run_native, ResolutionMode};

fn main() {
    init_tracing();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    std::process::exit(run_native(ResolutionMode::Direct, &args));
}
