mod format;
mod report;

pub(crate) use report::{
    print_backups, print_check_line, print_cleanup, print_pick_table, print_summary_table, print_switched,
};
