pub mod contract;
pub mod state;

#[cfg(test)]
mod testing;
