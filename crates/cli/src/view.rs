//! Terminal rendering for every view.

#![allow(clippy::print_stdout)]

use taskdesk_client::AuthSnapshot;
use taskdesk_core::{
    ChartSeries, Employee, EmployeeStats, PriorityCounts, RegisteredProfile, Task, TaskStats, User,
};

const BAR_WIDTH: usize = 30;

pub fn heading(title: &str) {
    println!("\n{title}");
    println!("{}", "=".repeat(title.chars().count()));
}

pub fn note(message: &str) {
    println!("{message}");
}

pub fn whoami(snapshot: &AuthSnapshot) {
    match (&snapshot.user, snapshot.is_authenticated) {
        (Some(user), true) => {
            println!("{} <{}>", user.full_name, user.email);
            if let Some(id) = user.id {
                println!("  id:   {id}");
            }
            println!("  role: {}", user.role);
        }
        (Some(user), false) => println!("Session for {} has expired", user.email),
        (None, _) => println!("Not logged in"),
    }
}

pub fn registered(profile: &RegisteredProfile) {
    println!(
        "Registered {} <{}> as {}. Log in to continue.",
        profile.full_name, profile.email, profile.role
    );
}

fn assignees(task: &Task) -> String {
    if task.assigned_users.is_empty() {
        return "-".to_owned();
    }
    task.assigned_users
        .iter()
        .map(User::initials)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn task_table(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found");
        return;
    }
    println!(
        "{:>5}  {:<32}  {:<12}  {:<7}  {:<10}  {:<9}  ASSIGNED",
        "ID", "TITLE", "STATUS", "PRIORITY", "DUE", "CHECKLIST"
    );
    for task in tasks {
        let (done, total) = task.checklist_progress();
        println!(
            "{:>5}  {:<32}  {:<12}  {:<7}  {:<10}  {:<9}  {}",
            task.id,
            truncate(&task.title, 32),
            task.status.label(),
            task.priority.label(),
            task.due_date
                .map_or_else(|| "-".to_owned(), |d| d.format("%Y-%m-%d").to_string()),
            format!("{done}/{total}"),
            assignees(task),
        );
    }
}

pub fn task_detail(task: &Task) {
    heading(&format!("#{} {}", task.id, task.title));
    if !task.description().is_empty() {
        println!("{}\n", task.description());
    }
    println!("Status:   {}", task.status.label());
    println!("Priority: {}", task.priority.label());
    if let Some(due) = task.due_date {
        println!("Due:      {}", due.format("%Y-%m-%d"));
    }
    if let Some(started) = task.start_date {
        println!("Started:  {}", started.format("%Y-%m-%d %H:%M"));
    }
    if !task.assigned_users.is_empty() {
        let names: Vec<&str> = task
            .assigned_users
            .iter()
            .map(|u| u.full_name.as_str())
            .collect();
        println!("Assigned: {}", names.join(", "));
    }

    let (done, total) = task.checklist_progress();
    if total > 0 {
        println!("\nChecklist ({done}/{total})");
        for item in &task.checklist_items {
            let mark = if item.completed { 'x' } else { ' ' };
            println!("  [{mark}] {:>4}  {}", item.id, item.text);
        }
    }
}

pub fn task_stats(stats: &TaskStats) {
    println!(
        "Total: {}  Pending: {}  In progress: {}  Completed: {}  Cancelled: {}",
        stats.total, stats.pending, stats.in_progress, stats.completed, stats.cancelled
    );
}

pub fn chart(title: &str, series: &ChartSeries) {
    println!("\n{title}");
    let max = series.values.iter().copied().max().unwrap_or(0).max(1);
    for (label, value) in series.points() {
        let width = value * BAR_WIDTH / max;
        println!(
            "  {label:<12} {:<pad$} {value}",
            "#".repeat(width),
            pad = BAR_WIDTH
        );
    }
}

pub fn priority_chart(counts: &PriorityCounts) {
    chart("Tasks by priority", &counts.priority_chart());
}

pub fn members(users: &[&User]) {
    if users.is_empty() {
        println!("No team members found");
        return;
    }
    println!("{:>5}  {:<4}  {:<28}  {:<32}  ROLE", "ID", "", "NAME", "EMAIL");
    for user in users {
        println!(
            "{:>5}  {:<4}  {:<28}  {:<32}  {}",
            user.id,
            user.initials(),
            truncate(&user.full_name, 28),
            truncate(&user.email, 32),
            user.role
        );
    }
}

pub fn employees(employees: &[Employee]) {
    if employees.is_empty() {
        println!("No employees found");
        return;
    }
    println!(
        "{:>5}  {:<24}  {:<28}  {:<16}  {:<16}  STATUS",
        "ID", "NAME", "EMAIL", "DEPARTMENT", "POSITION"
    );
    for e in employees {
        println!(
            "{:>5}  {:<24}  {:<28}  {:<16}  {:<16}  {}",
            e.id,
            truncate(&e.name, 24),
            truncate(&e.email, 28),
            truncate(e.department.as_deref().unwrap_or("-"), 16),
            truncate(e.position.as_deref().unwrap_or("-"), 16),
            e.status
        );
    }
}

pub fn employee_stats(stats: &EmployeeStats) {
    println!(
        "Total: {}  Active: {}  Inactive: {}  Terminated: {}",
        stats.total, stats.active, stats.inactive, stats.terminated
    );
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
