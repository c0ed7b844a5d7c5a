//! just-test CLI entry point

fn main() {
    just_test::cli::run();
}
