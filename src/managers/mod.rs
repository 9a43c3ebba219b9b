// eztag state managers
// Managers handle stateful operations: session, navigation history, and the
// repository view model.

pub mod navigation_manager;
pub mod repository_manager;
pub mod session_manager;
