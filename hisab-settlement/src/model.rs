/// Balance of each person (positive: is owed, negative: owes)
/// The unit is an integer minor unit (e.g., paise)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonBalance<'a> {
    pub name: &'a str,
    pub balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: i64,
}
