use std::process::ExitCode;

fn main() -> ExitCode {
    ExitCode::from(esfc_drv::run(std::env::args()) as u8)
}
