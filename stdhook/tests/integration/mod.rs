mod cli_tests;
mod install_tests;
mod uninstall_tests;
