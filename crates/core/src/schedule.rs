//! Demonstration appointment and prescription lists.
//!
//! These are fixed data; there is no scheduling or prescribing backend behind them.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub time: &'static str,
    pub patient: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: AppointmentStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PrescriptionStatus {
    Active,
    #[serde(rename = "Refill Needed")]
    RefillNeeded,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Prescription {
    pub patient: &'static str,
    pub medication: &'static str,
    pub dosage: &'static str,
    pub status: PrescriptionStatus,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl std::fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PrescriptionStatus::Active => "Active",
            PrescriptionStatus::RefillNeeded => "Refill Needed",
            PrescriptionStatus::Expired => "Expired",
        };
        f.write_str(label)
    }
}

pub fn todays_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            time: "09:00 AM",
            patient: "John Doe",
            kind: "Follow-up",
            status: AppointmentStatus::Confirmed,
        },
        Appointment {
            time: "10:30 AM",
            patient: "Jane Smith",
            kind: "New Patient",
            status: AppointmentStatus::Confirmed,
        },
        Appointment {
            time: "02:00 PM",
            patient: "Mike Johnson",
            kind: "Consultation",
            status: AppointmentStatus::Pending,
        },
        Appointment {
            time: "03:30 PM",
            patient: "Sarah Wilson",
            kind: "Follow-up",
            status: AppointmentStatus::Confirmed,
        },
    ]
}

pub fn current_prescriptions() -> Vec<Prescription> {
    vec![
        Prescription {
            patient: "John Doe",
            medication: "Lisinopril",
            dosage: "10mg daily",
            status: PrescriptionStatus::Active,
        },
        Prescription {
            patient: "Jane Smith",
            medication: "Metformin",
            dosage: "500mg twice daily",
            status: PrescriptionStatus::Active,
        },
        Prescription {
            patient: "Mike Johnson",
            medication: "Atorvastatin",
            dosage: "20mg daily",
            status: PrescriptionStatus::RefillNeeded,
        },
        Prescription {
            patient: "Sarah Wilson",
            medication: "Omeprazole",
            dosage: "40mg daily",
            status: PrescriptionStatus::Active,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointments_serialize_with_display_status() {
        let appointments = todays_appointments();
        assert_eq!(appointments.len(), 4);

        let json = serde_json::to_value(&appointments[2]).expect("serialize appointment");
        assert_eq!(json["type"], "Consultation");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn test_refill_status_matches_display() {
        let refill: Vec<Prescription> = current_prescriptions()
            .into_iter()
            .filter(|rx| rx.status == PrescriptionStatus::RefillNeeded)
            .collect();
        assert_eq!(refill.len(), 1);
        assert_eq!(refill[0].medication, "Atorvastatin");

        let json = serde_json::to_value(refill[0].status).expect("serialize status");
        assert_eq!(json, serde_json::Value::from(refill[0].status.to_string()));
    }
}
