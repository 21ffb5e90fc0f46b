use crate::calendar::{MonthLayout, WeekLayout, DAYS_PER_WEEK};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const BAR_H: u32 = 22;
const DAY_NUM_H: u32 = 32;
const CHIPS_PER_DAY: usize = 2;

const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Background and text colour for a task category.
fn category_chip(category: &str) -> (&'static str, &'static str) {
    match category {
        "work" => ("#dbeafe", "#1d4ed8"),
        "personal" => ("#fce7f3", "#be185d"),
        "health" => ("#d1fae5", "#065f46"),
        "study" => ("#fef3c7", "#92400e"),
        _ => ("#ede9fe", "#7c3aed"),
    }
}

pub fn render_month(layout: &MonthLayout<'_>, today: NaiveDate) -> String {
    let title = format!(
        "{} {}",
        MONTHS.get(layout.month as usize - 1).copied().unwrap_or("?"),
        layout.year
    );
    let (prev_year, prev_month) = shift_month(layout.year, layout.month, -1);
    let (next_year, next_month) = shift_month(layout.year, layout.month, 1);

    let mut weekdays = String::new();
    for name in WEEKDAYS {
        let _ = write!(weekdays, r#"<div class="weekday">{name}</div>"#);
    }

    let mut weeks = String::new();
    for week in &layout.weeks {
        render_week(&mut weeks, week, layout.year, layout.month, today);
    }

    INDEX_HTML
        .replace("{{TITLE}}", &title)
        .replace("{{PREV}}", &format!("/?year={prev_year}&month={prev_month}"))
        .replace("{{NEXT}}", &format!("/?year={next_year}&month={next_month}"))
        .replace("{{WEEKDAYS}}", &weekdays)
        .replace("{{WEEKS}}", &weeks)
}

fn render_week(out: &mut String, week: &WeekLayout<'_>, year: i32, month: u32, today: NaiveDate) {
    out.push_str(r#"<div class="week">"#);

    for bar in &week.bars {
        let (bg, fg) = category_chip(&bar.payload.category);
        let left = f64::from(bar.start_column - 1) / 7.0 * 100.0;
        let width = f64::from(bar.end_column - bar.start_column) / 7.0 * 100.0;
        let _ = write!(
            out,
            r#"<div class="bar" style="top:{top}px;left:calc({left:.4}% + 1px);width:calc({width:.4}% - 3px);background:{bg};color:{fg}">{title}</div>"#,
            top = DAY_NUM_H + (bar.lane - 1) * BAR_H,
            title = escape_html(&bar.payload.title),
        );
    }

    let padding = if week.lanes > 0 {
        format!(r#" style="padding-top:{}px""#, DAY_NUM_H + week.lanes * BAR_H + 2)
    } else {
        String::new()
    };

    out.push_str(r#"<div class="days">"#);
    for (column, cell) in week.days.iter().enumerate() {
        let Some(day) = cell.day else {
            out.push_str(r#"<div class="day empty"></div>"#);
            continue;
        };

        let mut classes = String::from("day");
        if NaiveDate::from_ymd_opt(year, month, day) == Some(today) {
            classes.push_str(" today");
        }
        match column {
            0 => classes.push_str(" sunday"),
            6 => classes.push_str(" saturday"),
            _ => {}
        }

        let _ = write!(out, r#"<div class="{classes}"{padding}><span class="num">{day}</span>"#);
        for task in cell.tasks.iter().take(CHIPS_PER_DAY) {
            let (bg, fg) = category_chip(&task.category);
            let _ = write!(
                out,
                r#"<div class="chip" style="background:{bg};color:{fg}">{}</div>"#,
                escape_html(&task.title)
            );
        }
        if cell.tasks.len() > CHIPS_PER_DAY {
            let _ = write!(out, r#"<div class="more">+{} more</div>"#, cell.tasks.len() - CHIPS_PER_DAY);
        }
        out.push_str("</div>");
    }
    out.push_str("</div></div>");
}

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Twin Time · {{TITLE}}</title>
  <style>
    :root {
      --ink: #1f2937;
      --muted: #9ca3af;
      --line: #e5e7eb;
      --accent: #6366f1;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: #f5f3ff;
      color: var(--ink);
      font-family: "Pretendard", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .calendar {
      width: min(980px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 20px;
      box-shadow: 0 18px 48px rgba(99, 102, 241, 0.12);
      padding: 24px;
    }

    .nav {
      display: flex;
      align-items: center;
      justify-content: center;
      gap: 18px;
      margin-bottom: 16px;
    }

    .nav a {
      color: var(--accent);
      font-size: 1.4rem;
      text-decoration: none;
    }

    .nav h1 {
      margin: 0;
      font-size: 1.3rem;
    }

    .weekdays,
    .days {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
    }

    .weekday {
      text-align: center;
      font-size: 0.8rem;
      color: var(--muted);
      padding-bottom: 6px;
    }

    .week {
      position: relative;
      border-top: 1px solid var(--line);
    }

    .day {
      position: relative;
      min-height: 96px;
      padding: 32px 6px 6px;
      border-right: 1px solid var(--line);
    }

    .day .num {
      position: absolute;
      top: 6px;
      left: 8px;
      font-size: 0.85rem;
    }

    .day.empty {
      background: #fafafa;
    }

    .day.today .num {
      color: var(--accent);
      font-weight: 700;
    }

    .day.sunday .num {
      color: #ef4444;
    }

    .day.saturday .num {
      color: #3b82f6;
    }

    .bar {
      z-index: 1;
      position: absolute;
      height: 20px;
      padding: 0 8px;
      border-radius: 6px;
      font-size: 0.75rem;
      line-height: 20px;
      white-space: nowrap;
      overflow: hidden;
      text-overflow: ellipsis;
    }

    .chip {
      margin-top: 3px;
      padding: 1px 6px;
      border-radius: 6px;
      font-size: 0.72rem;
      white-space: nowrap;
      overflow: hidden;
      text-overflow: ellipsis;
    }

    .more {
      margin-top: 2px;
      font-size: 0.7rem;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="calendar">
    <div class="nav">
      <a href="{{PREV}}">&lsaquo;</a>
      <h1>{{TITLE}}</h1>
      <a href="{{NEXT}}">&rsaquo;</a>
    </div>
    <div class="weekdays">{{WEEKDAYS}}</div>
    {{WEEKS}}
  </main>
</body>
</html>
"#;
