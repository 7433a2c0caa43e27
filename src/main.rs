use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    policy_navigator::cli::main()
}
