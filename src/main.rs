fn main() {
    if let Err(err) = cotton_pomodoro_lib::run() {
        eprintln!("cotton-pomodoro: {err:#}");
        std::process::exit(1);
    }
}
