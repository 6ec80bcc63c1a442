use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct BrowseOptions {
    /// Page to open first
    #[clap(long, short('p'), default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}
