pub mod cli;
pub mod config;
pub mod testing;

#[cfg(test)]
mod test_server;
