use rusqlite::named_params;

use crate::db::Database;
use crate::error::OsmprjError;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub format: fn(&CellValue) -> String,
}

fn fmt_plain(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) => text.clone(),
        CellValue::Int(number) => number.to_string(),
        CellValue::Float(number) => number.to_string(),
    }
}

fn fmt_round2(value: &CellValue) -> String {
    match value {
        CellValue::Float(number) => format!("{number:.2}"),
        other => fmt_plain(other),
    }
}

fn fmt_percent(value: &CellValue) -> String {
    match value {
        CellValue::Float(number) => format!("{number:.4}%"),
        other => fmt_plain(other),
    }
}

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

pub const AMENITY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "city",
        label: "City",
        color: GREEN,
        format: fmt_plain,
    },
    FieldSpec {
        name: "amenity",
        label: "Amenity",
        color: "",
        format: fmt_plain,
    },
    FieldSpec {
        name: "area_sq_km",
        label: "Area (sq. km)",
        color: CYAN,
        format: fmt_round2,
    },
    FieldSpec {
        name: "count",
        label: "# of amenities",
        color: CYAN,
        format: fmt_plain,
    },
    FieldSpec {
        name: "amenity_per_sq_km",
        label: "Amenities per sq. km",
        color: CYAN,
        format: fmt_round2,
    },
];

pub const PARKING_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "city",
        label: "City",
        color: GREEN,
        format: fmt_plain,
    },
    FieldSpec {
        name: "parking_area_sq_km",
        label: "Total parking area (sq. km)",
        color: CYAN,
        format: fmt_round2,
    },
    FieldSpec {
        name: "city_area_sq_km",
        label: "City area (sq. km)",
        color: CYAN,
        format: fmt_round2,
    },
    FieldSpec {
        name: "percentage_parking_area",
        label: "% Parking area",
        color: CYAN,
        format: fmt_percent,
    },
];

pub fn render_sql(template: &str, fields: &[FieldSpec]) -> String {
    let mut sql = template.to_string();
    for field in fields {
        sql = sql.replace(&format!("{{{}}}", field.name), field.name);
    }
    sql
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmenityRow {
    pub city: String,
    pub amenity: String,
    pub area_sq_km: f64,
    pub count: i64,
    pub amenity_per_sq_km: f64,
}

impl AmenityRow {
    pub fn values(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.city.clone()),
            CellValue::Text(self.amenity.clone()),
            CellValue::Float(self.area_sq_km),
            CellValue::Int(self.count),
            CellValue::Float(self.amenity_per_sq_km),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingRow {
    pub city: String,
    pub parking_area_sq_km: f64,
    pub city_area_sq_km: f64,
    pub percentage_parking_area: f64,
}

impl ParkingRow {
    pub fn values(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.city.clone()),
            CellValue::Float(self.parking_area_sq_km),
            CellValue::Float(self.city_area_sq_km),
            CellValue::Float(self.percentage_parking_area),
        ]
    }
}

pub fn amenity_counts_by_city(
    db: &Database,
    cities: &[String],
    amenity: &str,
) -> Result<Vec<AmenityRow>, OsmprjError> {
    let sql = render_sql(
        include_str!("reports/sql/amenity_counts_by_city.sql"),
        AMENITY_FIELDS,
    );
    let cities_json =
        serde_json::to_string(cities).map_err(|err| OsmprjError::Database(err.to_string()))?;

    let mut statement = db
        .connection()
        .prepare(&sql)
        .map_err(|err| OsmprjError::Database(err.to_string()))?;
    let rows = statement
        .query_map(
            named_params! { ":amenity": amenity, ":cities": cities_json },
            |row| {
                Ok(AmenityRow {
                    city: row.get(0)?,
                    amenity: row.get(1)?,
                    area_sq_km: row.get(2)?,
                    count: row.get(3)?,
                    amenity_per_sq_km: row.get(4)?,
                })
            },
        )
        .map_err(|err| OsmprjError::Database(err.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| OsmprjError::Database(err.to_string()))?;
    Ok(rows)
}

pub fn parking_area_by_city(
    db: &Database,
    cities: &[String],
) -> Result<Vec<ParkingRow>, OsmprjError> {
    let sql = render_sql(
        include_str!("reports/sql/parking_space_by_city.sql"),
        PARKING_FIELDS,
    );
    let cities_json =
        serde_json::to_string(cities).map_err(|err| OsmprjError::Database(err.to_string()))?;

    let mut statement = db
        .connection()
        .prepare(&sql)
        .map_err(|err| OsmprjError::Database(err.to_string()))?;
    let rows = statement
        .query_map(named_params! { ":cities": cities_json }, |row| {
            Ok(ParkingRow {
                city: row.get(0)?,
                parking_area_sq_km: row.get(1)?,
                city_area_sq_km: row.get(2)?,
                percentage_parking_area: row.get(3)?,
            })
        })
        .map_err(|err| OsmprjError::Database(err.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| OsmprjError::Database(err.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(db: &Database) {
        db.connection()
            .execute_batch(
                "CREATE TABLE city_areas (city TEXT, area_sq_km REAL);
                 CREATE TABLE amenities (city TEXT, amenity TEXT);
                 CREATE TABLE parking_areas (city TEXT, area_sq_km REAL);
                 INSERT INTO city_areas VALUES ('Munich', 310.0), ('Berlin', 891.0);
                 INSERT INTO amenities VALUES
                    ('Munich', 'cafe'), ('Munich', 'cafe'), ('Berlin', 'cafe'),
                    ('Munich', 'bank');
                 INSERT INTO parking_areas VALUES
                    ('Munich', 1.5), ('Munich', 0.5), ('Berlin', 4.0);",
            )
            .unwrap();
    }

    #[test]
    fn render_sql_substitutes_all_aliases() {
        let sql = render_sql(
            include_str!("reports/sql/amenity_counts_by_city.sql"),
            AMENITY_FIELDS,
        );
        assert!(!sql.contains('{'));
        assert!(sql.contains("AS amenity_per_sq_km"));
    }

    #[test]
    fn amenity_counts_filter_by_city_and_amenity() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let rows = amenity_counts_by_city(
            &db,
            &["Munich".to_string(), "Berlin".to_string()],
            "cafe",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].city, "Munich");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].city, "Berlin");
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn amenity_counts_ignore_unlisted_cities() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let rows = amenity_counts_by_city(&db, &["Berlin".to_string()], "cafe").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "Berlin");
    }

    #[test]
    fn parking_share_sums_per_city() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let rows =
            parking_area_by_city(&db, &["Munich".to_string(), "Berlin".to_string()]).unwrap();
        assert_eq!(rows.len(), 2);
        let munich = rows.iter().find(|row| row.city == "Munich").unwrap();
        assert!((munich.parking_area_sq_km - 2.0).abs() < 1e-9);
        assert!((munich.percentage_parking_area - 2.0 / 310.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn percent_formatter() {
        assert_eq!(fmt_percent(&CellValue::Float(0.64516)), "0.6452%");
        assert_eq!(fmt_round2(&CellValue::Float(3.141)), "3.14");
        assert_eq!(fmt_round2(&CellValue::Float(2.5)), "2.50");
    }
}
