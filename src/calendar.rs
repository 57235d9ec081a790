//! Month grid for the calendar view.
use chrono::{Datelike, Duration, NaiveDate};

use crate::{dates, Collection, Event};

/// One square of the month grid.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for the padding days borrowed from the adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<&'a Event>,
}

/// Sunday-first weeks covering a whole month.
#[derive(Debug, Clone)]
pub struct MonthGrid<'a> {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub weeks: Vec<Vec<DayCell<'a>>>,
}

impl<'a> MonthGrid<'a> {
    pub fn build(events: &'a Collection<Event>, month: NaiveDate, today: NaiveDate) -> Self {
        let first = dates::start_of_month(month);
        let last = dates::end_of_month(month);
        let grid_start =
            first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
        let grid_end =
            last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));

        let cells: Vec<DayCell<'a>> = grid_start
            .iter_days()
            .take_while(|day| *day <= grid_end)
            .map(|date| DayCell {
                date,
                in_month: dates::is_same_month(date, first),
                is_today: dates::is_same_day(date, today),
                events: events.on_day(date),
            })
            .collect();

        let weeks = cells.chunks(7).map(<[DayCell<'a>]>::to_vec).collect();
        MonthGrid {
            month: first,
            weeks,
        }
    }

    /// e.g. "June 2024"
    pub fn title(&self) -> String {
        self.month.format("%B %Y").to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell<'a>> {
        self.weeks.iter().flatten()
    }

    pub fn event_count(&self) -> usize {
        self.days()
            .filter(|cell| cell.in_month)
            .map(|cell| cell.events.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Utc, Weekday};

    use super::*;
    use crate::EventPatch;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_is_padded_to_whole_weeks() {
        let events = Collection::<Event>::new();
        // June 2024 starts on a Saturday and ends on a Sunday.
        let grid = MonthGrid::build(&events, ymd(2024, 6, 15), ymd(2024, 6, 3));

        assert_eq!(grid.title(), "June 2024");
        assert_eq!(grid.weeks.len(), 6);
        assert!(grid.weeks.iter().all(|week| week.len() == 7));

        let first = &grid.weeks[0][0];
        assert_eq!(first.date, ymd(2024, 5, 26));
        assert_eq!(first.date.weekday(), Weekday::Sun);
        assert!(!first.in_month);

        assert_eq!(grid.days().filter(|cell| cell.in_month).count(), 30);
        assert_eq!(grid.days().filter(|cell| cell.is_today).count(), 1);
        assert_eq!(grid.weeks[5][6].date, ymd(2024, 7, 6));
    }

    #[test]
    fn cells_carry_their_events() {
        let mut events = Collection::<Event>::new();
        for day in [3, 3, 17] {
            events.create(
                EventPatch {
                    title: Some("x".to_string()),
                    date: Some(ymd(2024, 6, day)),
                    ..EventPatch::default()
                },
                Utc::now(),
            );
        }
        let grid = MonthGrid::build(&events, ymd(2024, 6, 1), ymd(2024, 1, 1));
        let third = grid.days().find(|cell| cell.date == ymd(2024, 6, 3)).unwrap();
        assert_eq!(third.events.len(), 2);
        assert_eq!(grid.event_count(), 3);
    }
}
