pub(crate) mod funds;
pub(crate) mod health;
pub(crate) mod portfolio;
pub(crate) mod prices;
pub(crate) mod trades;
