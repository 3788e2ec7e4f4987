use vkmemprops::cli::{exit_code, run_memory_properties_cli, EXIT_CONFIG_ERROR, USAGE};
use vkmemprops::error::ProbeError;

fn main() {
    env_logger::init();

    if let Err(err) = run_memory_properties_cli() {
        let code = exit_code(&err);
        match err.downcast_ref::<ProbeError>() {
            Some(ProbeError::Config(msg)) if code == EXIT_CONFIG_ERROR => {
                eprintln!("[vk-memory-properties] {msg}");
                eprintln!("{USAGE}");
            }
            Some(probe_err) => eprintln!("[{}] {:#}", probe_err.category(), err),
            None => eprintln!("error: {:#}", err),
        }
        std::process::exit(code);
    }
}
