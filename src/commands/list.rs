use super::open_tasks;
use crate::{
    libs::{
        config::Config,
        messages::Message,
        page::{PageSize, SortColumn, SortDirection},
        view::View,
        view_state::ViewState,
    },
    msg_debug, msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Go to page N (1-based); clamped to the last page
    #[arg(short, long, conflicts_with_all = ["next", "prev"])]
    page: Option<i64>,
    /// Go to the next page
    #[arg(short, long, conflicts_with = "prev")]
    next: bool,
    /// Go to the previous page
    #[arg(short = 'P', long)]
    prev: bool,
    /// Tasks per page (10, 25, 50 or 100); returns to the first page
    #[arg(short, long, value_parser = parse_page_size)]
    size: Option<PageSize>,
    /// Sort by a column; repeating the same column flips the direction
    #[arg(long, value_parser = parse_sort_column)]
    sort: Option<SortColumn>,
    /// Forget saved navigation and sort
    #[arg(long)]
    reset: bool,
}

pub fn cmd(args: ListArgs) -> Result<()> {
    let config = Config::read()?;
    let mut pager = if args.reset {
        msg_info!(Message::SortReset);
        ViewState::initial(&config)
    } else {
        ViewState::load(&config)?
    };

    if let Some(size) = args.size {
        pager.set_page_size(size);
        msg_info!(Message::PageSizeChanged(size.get()));
    }
    if let Some(column) = args.sort {
        pager.sort_by(column);
        let direction = match pager.sort.direction {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        };
        msg_info!(Message::SortChanged(column.to_string(), direction.to_string()));
    }
    if let Some(page) = args.page {
        pager.go_to(page.saturating_sub(1));
    }
    if args.next {
        pager.next();
    }
    if args.prev {
        pager.prev();
    }

    let mut tasks = open_tasks()?;
    msg_debug!(format!("page request: {:?}", pager.request()));
    let page = tasks.page(&pager.request())?;
    pager.sync(&page);

    if page.total == 0 {
        msg_info!(Message::NoTasks);
    } else {
        msg_print!(Message::TasksHeader);
    }
    View::page(&page, &pager.sort)?;

    if let Err(e) = ViewState::save(&pager) {
        msg_warning!(Message::ViewStateSaveFailed(e.to_string()));
    }

    Ok(())
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    let size: usize = value.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    PageSize::new(size).map_err(|e| e.to_string())
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    value.parse::<SortColumn>().map_err(|e| e.to_string())
}
