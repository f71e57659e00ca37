fn main() {
    objc_grammar::cli::run();
}
