//! The deterministic dataset served when no backend is reachable.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, Barber, BarberId, BarberStatus, DaySchedule,
    Notice, NoticeId, Weekday,
};

/// Contents of every collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Appointments across all barbers.
    pub appointments: Vec<Appointment>,
    /// Barber roster.
    pub barbers: Vec<Barber>,
    /// Notices, active and archived.
    pub notices: Vec<Notice>,
}

fn date(month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, month, day)
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn booking(
    id: i64,
    barber: &str,
    client: &str,
    phone: &str,
    service: &str,
    day: (u32, u32),
    start: (u32, u32),
    minutes: i64,
    price: i64,
) -> Appointment {
    let start = at(start.0, start.1);
    Appointment {
        id: AppointmentId::new(id),
        barber_id: BarberId::new(barber),
        client_name: client.to_string(),
        client_phone: phone.to_string(),
        date: date(day.0, day.1),
        start_time: Some(start),
        end_time: Some(start + chrono::Duration::minutes(minutes)),
        service: service.to_string(),
        price: Decimal::new(price, 0),
        payment_method: String::new(),
        status: Some(AppointmentStatus::Scheduled),
    }
}

fn week(hours: [(bool, (u32, u32), (u32, u32)); 7]) -> BTreeMap<Weekday, DaySchedule> {
    Weekday::ALL
        .into_iter()
        .zip(hours)
        .map(|(day, (active, start, end))| {
            (
                day,
                DaySchedule {
                    active,
                    start: at(start.0, start.1),
                    end: at(end.0, end.1),
                },
            )
        })
        .collect()
}

fn roster() -> Vec<Barber> {
    vec![
        Barber {
            id: BarberId::new("lele"),
            name: "Lele".to_string(),
            email: "lele@barbearia.com".to_string(),
            phone: "(11) 99999-6666".to_string(),
            status: BarberStatus::Active,
            theme_color: Some("#ff6b35".to_string()),
            start_time: Some(at(9, 0)),
            end_time: Some(at(17, 0)),
            available_days: Vec::new(),
            custom_schedule: Some(week([
                (true, (9, 0), (17, 0)),
                (true, (9, 0), (17, 0)),
                (false, (9, 0), (17, 0)),
                (true, (9, 0), (17, 0)),
                (true, (9, 0), (17, 0)),
                (true, (9, 0), (15, 0)),
                (false, (9, 0), (17, 0)),
            ])),
            specialties: vec![
                "Corte Feminino".to_string(),
                "Corte Infantil".to_string(),
                "Escova".to_string(),
            ],
            commission_percent: 55,
        },
        Barber {
            id: BarberId::new("renne"),
            name: "Renne".to_string(),
            email: "renne@barbearia.com".to_string(),
            phone: "(11) 99999-5555".to_string(),
            status: BarberStatus::Active,
            theme_color: Some("#00d4ff".to_string()),
            start_time: Some(at(8, 0)),
            end_time: Some(at(18, 0)),
            available_days: Vec::new(),
            custom_schedule: Some(week([
                (true, (8, 0), (17, 0)),
                (true, (8, 0), (17, 0)),
                (true, (8, 0), (17, 0)),
                (true, (8, 0), (17, 0)),
                (true, (8, 0), (18, 0)),
                (true, (8, 0), (16, 0)),
                (false, (8, 0), (18, 0)),
            ])),
            specialties: vec![
                "Corte Masculino".to_string(),
                "Barba".to_string(),
                "Degradê".to_string(),
            ],
            commission_percent: 60,
        },
    ]
}

/// Publication time of the seeded notice.
fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds the fallback dataset: two barbers, seven appointments on
/// 2025-06-26/27, and one active notice.
///
/// The result is the same on every call.
#[must_use]
#[rustfmt::skip]
pub fn fallback_dataset() -> Dataset {
    let appointments = vec![
        booking(1, "renne", "João Silva", "(11) 99999-1111", "Corte + Barba", (6, 26), (9, 0), 40, 45),
        booking(2, "renne", "Pedro Santos", "(11) 99999-2222", "Corte", (6, 26), (13, 10), 30, 25),
        booking(3, "renne", "Carlos Lima", "(11) 99999-3333", "Barba", (6, 26), (15, 45), 20, 20),
        booking(4, "renne", "Roberto Oliveira", "(11) 99999-4444", "Corte + Barba", (6, 27), (14, 30), 40, 45),
        booking(5, "lele", "Ana Costa", "(11) 99999-5555", "Corte Feminino", (6, 26), (11, 20), 40, 35),
        booking(6, "lele", "Ricardo Mendes", "(11) 99999-6666", "Corte + Barba", (6, 26), (16, 15), 40, 45),
        booking(7, "lele", "Maria Oliveira", "(11) 99999-3333", "Corte Feminino", (6, 27), (10, 0), 40, 35),
    ];

    let notices = vec![Notice {
        id: NoticeId::new(1),
        title: crate::domain::notice::DEFAULT_NOTICE_TITLE.to_string(),
        message: "Estamos funcionando normalmente! Agende seu horário.".to_string(),
        active: true,
        created_at: seeded_at(),
        created_by: "Admin".to_string(),
    }];

    Dataset {
        appointments,
        barbers: roster(),
        notices,
    }
}
