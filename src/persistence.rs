//! On-disk settings: setpoint schedule, gas list and parameters.
//!
//! Files are fixed-width host-endian records under a magic + version
//! header. Files written before the header was introduced parse
//! transparently; the next save rewrites them in the current format.
//! Loading a missing file yields the seeded defaults.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::common::{
    Depth, Environment, Gas, GasList, GasStatus, GasType, Parameters, PersistenceError, SetPoint,
    SetPoints, Time,
};

const MAGIC: u32 = 0x4450_4C4E; // "DPLN"
const VERSION: u32 = 1;

pub const SETPOINTS_FILE: &str = "setpoints.dat";
pub const GASLIST_FILE: &str = "gaslist.dat";
pub const PARAMETERS_FILE: &str = "parameters.dat";

/// Per-user application data directory for the planner.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join("dive-planner"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home).join(".local/share/dive-planner"));
        }
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        if !appdata.is_empty() {
            return Some(PathBuf::from(appdata).join("dive-planner"));
        }
    }
    None
}

pub fn load_set_points(dir: &Path) -> Result<SetPoints, PersistenceError> {
    let Some(mut reader) = open_payload(&dir.join(SETPOINTS_FILE))? else {
        return Ok(SetPoints::default());
    };
    let count = read_u64(&mut reader)?;
    let mut points = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let depth = read_f64(&mut reader)?;
        let setpoint = read_f64(&mut reader)?;
        points.push(SetPoint::new(Depth::from_meters(depth), setpoint));
    }
    Ok(SetPoints::new(points))
}

pub fn save_set_points(dir: &Path, set_points: &SetPoints) -> Result<(), PersistenceError> {
    let mut writer = create_payload(dir, SETPOINTS_FILE)?;
    write_u64(&mut writer, set_points.len() as u64)?;
    for point in set_points.iter() {
        write_f64(&mut writer, point.depth.as_meters())?;
        write_f64(&mut writer, point.setpoint)?;
    }
    Ok(())
}

pub fn load_gas_list(dir: &Path) -> Result<GasList, PersistenceError> {
    let Some(mut reader) = open_payload(&dir.join(GASLIST_FILE))? else {
        return Ok(GasList::default());
    };
    let count = read_u64(&mut reader)?;
    let mut gases = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let o2_pct = read_f64(&mut reader)?;
        let he_pct = read_f64(&mut reader)?;
        let gas_type = match read_i32(&mut reader)? {
            0 => GasType::Bottom,
            1 => GasType::Deco,
            2 => GasType::Diluent,
            _ => return Err(PersistenceError::Corrupt("unknown gas type")),
        };
        let status = match read_i32(&mut reader)? {
            0 => GasStatus::Active,
            1 => GasStatus::Inactive,
            _ => return Err(PersistenceError::Corrupt("unknown gas status")),
        };
        let gas = Gas::new(o2_pct, he_pct, gas_type)
            .map_err(|_| PersistenceError::Corrupt("invalid gas mix"))?
            .with_status(status);
        gases.push(gas);
    }
    Ok(GasList::new(gases))
}

pub fn save_gas_list(dir: &Path, gas_list: &GasList) -> Result<(), PersistenceError> {
    let mut writer = create_payload(dir, GASLIST_FILE)?;
    write_u64(&mut writer, gas_list.len() as u64)?;
    for gas in gas_list.iter() {
        write_f64(&mut writer, gas.o2_pct())?;
        write_f64(&mut writer, gas.he_pct())?;
        let gas_type = match gas.gas_type() {
            GasType::Bottom => 0,
            GasType::Deco => 1,
            GasType::Diluent => 2,
        };
        write_i32(&mut writer, gas_type)?;
        let status = match gas.status() {
            GasStatus::Active => 0,
            GasStatus::Inactive => 1,
        };
        write_i32(&mut writer, status)?;
    }
    Ok(())
}

pub fn load_parameters(dir: &Path) -> Result<Parameters, PersistenceError> {
    let Some(mut reader) = open_payload(&dir.join(PARAMETERS_FILE))? else {
        return Ok(Parameters::default());
    };
    let mut params = Parameters::default();
    let gf_low = read_u8(&mut reader)?;
    let gf_high = read_u8(&mut reader)?;
    params.gf = (gf_low, gf_high);
    params.max_ppo2_bottom = read_f64(&mut reader)?;
    params.max_ppo2_deco = read_f64(&mut reader)?;
    params.max_ppo2_diluent = read_f64(&mut reader)?;
    params.min_ppo2 = read_f64(&mut reader)?;
    params.sac_bottom = read_f64(&mut reader)?;
    params.sac_deco = read_f64(&mut reader)?;
    params.warning_density = read_f64(&mut reader)?;
    params.end_limit = Depth::from_meters(read_f64(&mut reader)?);
    params.o2_narcotic = read_u8(&mut reader)? != 0;
    params.ascent_rate = read_f64(&mut reader)?;
    params.descent_rate = read_f64(&mut reader)?;
    params.stop_interval = Depth::from_meters(read_f64(&mut reader)?);
    params.max_stop_minutes = read_u32(&mut reader)?;
    params.tts_budget = Time::from_minutes(read_f64(&mut reader)?);
    params.residual_cns = read_f64(&mut reader)?;
    params.surface_interval = Time::from_minutes(read_f64(&mut reader)?);
    params.tank_count = read_u32(&mut reader)?;
    params.tank_volume = read_f64(&mut reader)?;
    params.fill_pressure = read_f64(&mut reader)?;
    params.reserve_multiplier = read_f64(&mut reader)?;
    let surface_pressure = read_i32(&mut reader)?;
    let water_density = read_f64(&mut reader)?;
    params.environment = Environment::new(surface_pressure, water_density);
    Ok(params)
}

pub fn save_parameters(dir: &Path, params: &Parameters) -> Result<(), PersistenceError> {
    let mut writer = create_payload(dir, PARAMETERS_FILE)?;
    write_u8(&mut writer, params.gf.0)?;
    write_u8(&mut writer, params.gf.1)?;
    write_f64(&mut writer, params.max_ppo2_bottom)?;
    write_f64(&mut writer, params.max_ppo2_deco)?;
    write_f64(&mut writer, params.max_ppo2_diluent)?;
    write_f64(&mut writer, params.min_ppo2)?;
    write_f64(&mut writer, params.sac_bottom)?;
    write_f64(&mut writer, params.sac_deco)?;
    write_f64(&mut writer, params.warning_density)?;
    write_f64(&mut writer, params.end_limit.as_meters())?;
    write_u8(&mut writer, params.o2_narcotic as u8)?;
    write_f64(&mut writer, params.ascent_rate)?;
    write_f64(&mut writer, params.descent_rate)?;
    write_f64(&mut writer, params.stop_interval.as_meters())?;
    write_u32(&mut writer, params.max_stop_minutes)?;
    write_f64(&mut writer, params.tts_budget.as_minutes())?;
    write_f64(&mut writer, params.residual_cns)?;
    write_f64(&mut writer, params.surface_interval.as_minutes())?;
    write_u32(&mut writer, params.tank_count)?;
    write_f64(&mut writer, params.tank_volume)?;
    write_f64(&mut writer, params.fill_pressure)?;
    write_f64(&mut writer, params.reserve_multiplier)?;
    write_i32(&mut writer, params.environment.surface_pressure)?;
    write_f64(&mut writer, params.environment.water_density)?;
    Ok(())
}

/// Opens a settings file positioned after the header. `None` when the file
/// doesn't exist. A file without the magic word is taken to be the legacy
/// headerless layout and is replayed from the start.
fn open_payload(path: &Path) -> Result<Option<io::Cursor<Vec<u8>>>, PersistenceError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut cursor = io::Cursor::new(bytes);
    let bytes = cursor.get_ref();
    if bytes.len() >= 8 {
        let magic = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic == MAGIC {
            let version = u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
            if version != VERSION {
                return Err(PersistenceError::UnsupportedVersion { found: version });
            }
            cursor.set_position(8);
        }
    }
    Ok(Some(cursor))
}

fn create_payload(dir: &Path, file_name: &str) -> Result<File, PersistenceError> {
    fs::create_dir_all(dir)?;
    let mut file = File::create(dir.join(file_name))?;
    file.write_all(&MAGIC.to_ne_bytes())?;
    file.write_all(&VERSION.to_ne_bytes())?;
    Ok(file)
}

fn read_exact<const N: usize>(reader: &mut impl Read) -> Result<[u8; N], PersistenceError> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|_| PersistenceError::Corrupt("truncated settings file"))?;
    Ok(buf)
}

fn read_u8(reader: &mut impl Read) -> Result<u8, PersistenceError> {
    Ok(read_exact::<1>(reader)?[0])
}

fn read_u32(reader: &mut impl Read) -> Result<u32, PersistenceError> {
    Ok(u32::from_ne_bytes(read_exact::<4>(reader)?))
}

fn read_i32(reader: &mut impl Read) -> Result<i32, PersistenceError> {
    Ok(i32::from_ne_bytes(read_exact::<4>(reader)?))
}

fn read_u64(reader: &mut impl Read) -> Result<u64, PersistenceError> {
    Ok(u64::from_ne_bytes(read_exact::<8>(reader)?))
}

fn read_f64(reader: &mut impl Read) -> Result<f64, PersistenceError> {
    Ok(f64::from_ne_bytes(read_exact::<8>(reader)?))
}

fn write_u8(writer: &mut impl Write, val: u8) -> Result<(), PersistenceError> {
    Ok(writer.write_all(&[val])?)
}

fn write_u32(writer: &mut impl Write, val: u32) -> Result<(), PersistenceError> {
    Ok(writer.write_all(&val.to_ne_bytes())?)
}

fn write_i32(writer: &mut impl Write, val: i32) -> Result<(), PersistenceError> {
    Ok(writer.write_all(&val.to_ne_bytes())?)
}

fn write_u64(writer: &mut impl Write, val: u64) -> Result<(), PersistenceError> {
    Ok(writer.write_all(&val.to_ne_bytes())?)
}

fn write_f64(writer: &mut impl Write, val: f64) -> Result<(), PersistenceError> {
    Ok(writer.write_all(&val.to_ne_bytes())?)
}
