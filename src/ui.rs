use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{queue, QueueableCommand};

use crate::stopwatch::StopwatchState;
use stopwatch_core::{format_display, split_display};

pub const FRAME_W: u16 = 40;
pub const FRAME_H: u16 = 30;

const LIST_TOP: u16 = 16;
const LIST_BOTTOM: u16 = FRAME_H - 4;

const PHONE_BG: Color = Color::Black;
const BEZEL: Color = Color::Rgb { r: 31, g: 41, b: 55 };
const PANEL: Color = Color::Rgb { r: 17, g: 24, b: 39 };
const MUTED: Color = Color::Rgb { r: 156, g: 163, b: 175 };
const DIM: Color = Color::Rgb { r: 107, g: 114, b: 128 };
const INDIGO: Color = Color::Rgb { r: 79, g: 70, b: 229 };
const EMERALD: Color = Color::Rgb { r: 16, g: 185, b: 129 };
const ROSE: Color = Color::Rgb { r: 225, g: 29, b: 72 };
const AMBER: Color = Color::Rgb { r: 245, g: 158, b: 11 };

/// Text around the display that isn't stopwatch state.
#[derive(Clone, Debug)]
pub struct Chrome {
    pub clock: String,
    pub title: String,
}

#[derive(Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

fn width(text: &str) -> u16 {
    text.chars().count() as u16
}

fn put<W: Write>(out: &mut W, at: Origin, x: u16, y: u16, text: &str, fg: Color, bg: Color) -> io::Result<()> {
    queue!(out, MoveTo(at.x + x, at.y + y), PrintStyledContent(text.with(fg).on(bg)))
}

fn put_centered<W: Write>(out: &mut W, at: Origin, y: u16, text: &str, fg: Color, bg: Color) -> io::Result<()> {
    let x = FRAME_W.saturating_sub(width(text)) / 2;
    put(out, at, x, y, text, fg, bg)
}

fn origin(screensize: (u16, u16)) -> Option<Origin> {
    let (cols, rows) = screensize;
    if cols < FRAME_W || rows < FRAME_H + 1 {
        return None;
    }
    Some(Origin {
        x: (cols - FRAME_W) / 2,
        y: (rows - FRAME_H - 1) / 2,
    })
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?;
    Ok(())
}

fn draw_too_small<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), PrintStyledContent("Terminal too small".with(MUTED)))?;
    out.flush()
}

/// Bezel, notch, status bar and home indicator. Returns where the frame landed.
fn draw_frame<W: Write>(out: &mut W, screensize: (u16, u16), chrome: &Chrome) -> io::Result<Option<Origin>> {
    clear_screen(out)?;
    let Some(at) = origin(screensize) else {
        draw_too_small(out)?;
        return Ok(None);
    };

    let inner = "─".repeat(FRAME_W as usize - 2);
    put(out, at, 0, 0, &format!("╭{}╮", inner), BEZEL, PHONE_BG)?;
    let blank = " ".repeat(FRAME_W as usize - 2);
    for y in 1..FRAME_H - 1 {
        put(out, at, 0, y, "│", BEZEL, PHONE_BG)?;
        put(out, at, 1, y, &blank, Color::White, PHONE_BG)?;
        put(out, at, FRAME_W - 1, y, "│", BEZEL, PHONE_BG)?;
    }
    put(out, at, 0, FRAME_H - 1, &format!("╰{}╯", inner), BEZEL, PHONE_BG)?;

    // Dynamic island with its camera dot
    put_centered(out, at, 0, "▀▀▀▀▀▀▀▀▀▀▀▀", PHONE_BG, BEZEL)?;
    put(out, at, FRAME_W / 2 + 4, 0, "●", DIM, PHONE_BG)?;

    put(out, at, 3, 2, &chrome.clock, MUTED, PHONE_BG)?;
    let icons = "▂▄▆█ ≋ ▮▮▮▯";
    put(out, at, FRAME_W - 3 - width(icons), 2, icons, MUTED, PHONE_BG)?;

    put_centered(out, at, FRAME_H - 3, "━━━━━━━━━━━━━━", DIM, PHONE_BG)?;
    Ok(Some(at))
}

fn draw_display<W: Write>(out: &mut W, at: Origin, elapsed_ms: u64, title: &str) -> io::Result<()> {
    let panel = " ".repeat(FRAME_W as usize - 6);
    for y in 4..11 {
        put(out, at, 3, y, &panel, Color::White, PANEL)?;
    }
    let (whole, centis) = split_display(elapsed_ms);
    let whole = whole.bold().with(Color::White).on(PANEL);
    let x = FRAME_W.saturating_sub(whole.content().chars().count() as u16) / 2;
    queue!(out, MoveTo(at.x + x, at.y + 6), PrintStyledContent(whole))?;
    put_centered(out, at, 7, &format!(".{}", centis), MUTED, PANEL)?;
    put_centered(out, at, 9, title, MUTED, PANEL)
}

fn draw_controls<W: Write>(out: &mut W, at: Origin, running: bool) -> io::Result<()> {
    let (toggle_glyph, toggle_color) = if running { ("❚❚", ROSE) } else { ("▶ ", EMERALD) };
    put(out, at, 6, 12, "  ↺  ", Color::White, INDIGO)?;
    put(out, at, 17, 12, &format!("  {} ", toggle_glyph), Color::White, toggle_color)?;
    put(out, at, 28, 12, "  ⚑  ", Color::White, AMBER)?;

    put(out, at, 8, 13, "r", DIM, PHONE_BG)?;
    put(out, at, 17, 13, "space", DIM, PHONE_BG)?;
    put(out, at, 30, 13, "l", DIM, PHONE_BG)
}

fn draw_laps<W: Write>(out: &mut W, at: Origin, state: &StopwatchState) -> io::Result<()> {
    put(out, at, 3, 15, "Laps", MUTED, PHONE_BG)?;

    let laps = state.timer.laps();
    if laps.is_empty() {
        put_centered(out, at, LIST_TOP + 2, "◷", DIM, PHONE_BG)?;
        return put_centered(out, at, LIST_TOP + 3, "No laps recorded", DIM, PHONE_BG);
    }

    let max_visible = (LIST_BOTTOM - LIST_TOP) as usize;
    let rows = state.visible_laps(max_visible);
    for (i, row) in rows.iter().enumerate() {
        let y = LIST_TOP + i as u16;
        let lap_time = format_display(row.elapsed_ms);
        put(out, at, 4, y, &format!("Lap {}", row.number), MUTED, PHONE_BG)?;
        put(out, at, FRAME_W - 4 - width(&lap_time), y, &lap_time, Color::White, PHONE_BG)?;
    }

    // Scroll markers
    if state.lap_scroll_offset > 0 {
        put(out, at, FRAME_W - 4, 15, "▲", DIM, PHONE_BG)?;
    }
    if state.lap_scroll_offset + rows.len() < laps.len() {
        put(out, at, FRAME_W - 4, LIST_BOTTOM, "▼", DIM, PHONE_BG)?;
    }
    Ok(())
}

fn draw_footer<W: Write>(out: &mut W, at: Origin, text: &str) -> io::Result<()> {
    let x = FRAME_W.saturating_sub(width(text)) / 2;
    queue!(out, MoveTo(at.x + x, at.y + FRAME_H), PrintStyledContent(text.with(DIM)))
}

pub fn draw_stopwatch<W: Write>(
    out: &mut W,
    screensize: (u16, u16),
    state: &StopwatchState,
    chrome: &Chrome,
) -> io::Result<()> {
    let Some(at) = draw_frame(out, screensize, chrome)? else {
        return Ok(());
    };

    draw_display(out, at, state.timer.elapsed_ms(), &chrome.title)?;
    draw_controls(out, at, state.timer.is_running())?;
    draw_laps(out, at, state)?;
    draw_footer(out, at, "?=help  q=quit")?;

    out.flush()
}

pub fn draw_help<W: Write>(out: &mut W, screensize: (u16, u16), chrome: &Chrome, help_text: &str) -> io::Result<()> {
    let Some(at) = draw_frame(out, screensize, chrome)? else {
        return Ok(());
    };

    let mut y = 4;
    for (i, line) in help_text.lines().enumerate() {
        if y >= FRAME_H - 4 {
            break;
        }
        let fg = if i == 0 { Color::White } else { MUTED };
        put(out, at, 4, y, line, fg, PHONE_BG)?;
        y += 1;
    }

    draw_footer(out, at, "Press any key to close")?;
    out.flush()
}

pub fn draw_confirm_exit<W: Write>(out: &mut W, screensize: (u16, u16), chrome: &Chrome) -> io::Result<()> {
    let Some(at) = draw_frame(out, screensize, chrome)? else {
        return Ok(());
    };

    put_centered(out, at, 10, "Timer Running", Color::White, PHONE_BG)?;
    put_centered(out, at, 12, "The stopwatch is still", MUTED, PHONE_BG)?;
    put_centered(out, at, 13, "running. Quit anyway?", MUTED, PHONE_BG)?;
    put_centered(out, at, 16, "y = quit    n = cancel", DIM, PHONE_BG)?;

    out.flush()
}
