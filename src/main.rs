fn main() -> miette::Result<()> {
    bnf_complete::cli::run()
}
