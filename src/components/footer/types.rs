#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterItem {
    pub key: &'static str,
    pub desc: &'static str,
    pub highlighted: bool,
}

impl FooterItem {
    pub const fn new(key: &'static str, desc: &'static str) -> Self {
        Self {
            key,
            desc,
            highlighted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterGroup {
    pub name: &'static str,
    pub items: Vec<FooterItem>,
}
