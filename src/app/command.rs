#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ScheduleLookup { generation: u64 },
    CancelLookup,
    Lookup { query: String, generation: u64 },
    Navigate(String),
    Batch(Vec<Command>),
}
