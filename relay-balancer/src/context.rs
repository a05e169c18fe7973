/// Per-datagram context passed into upstream selection.
#[derive(Clone, Debug)]
pub struct QueryContext {
    pub qtype: u16,
    pub client_location: Option<(f64, f64)>,
    pub recursion_desired: bool,
    pub priority: u8,
}

impl QueryContext {
    pub fn new(qtype: u16) -> Self {
        Self {
            qtype,
            client_location: None,
            recursion_desired: true,
            priority: 0,
        }
    }
}
