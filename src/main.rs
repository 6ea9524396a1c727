fn main() {
    onair::app::cli::run();
}
