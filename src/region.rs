//! Region lookup
//!
//! Loads the province → city → district tree from `city_code.json` and lets
//! the user pick a district through a numbered terminal menu.

use crate::config::RegionConfig;
use crate::models::RegionSelection;
use crate::{CnWeatherError, Result};
use serde::Deserialize;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

/// One node of the region tree; districts carry a `code`
#[derive(Debug, Deserialize, Clone)]
pub struct RegionNode {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub zone: Vec<RegionNode>,
}

/// Root of the region dataset
#[derive(Debug, Deserialize, Clone)]
pub struct RegionTree {
    #[serde(default)]
    pub zone: Vec<RegionNode>,
}

impl RegionTree {
    /// Load the dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading region data from {}", path.display());

        let json = fs::read_to_string(path)?;
        let tree = Self::parse(&json)?;

        info!(
            "Loaded {} provinces from {}",
            tree.zone.len(),
            path.display()
        );
        Ok(tree)
    }

    /// Parse the dataset from a JSON string
    pub fn parse(json: &str) -> Result<Self> {
        let tree: RegionTree = serde_json::from_str(json)?;
        if tree.zone.is_empty() {
            return Err(CnWeatherError::region("未找到省份数据"));
        }
        Ok(tree)
    }

    /// Find the district with the given code
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<RegionSelection> {
        fn walk(nodes: &[RegionNode], code: &str, path: &mut Vec<String>) -> Option<RegionSelection> {
            for node in nodes {
                path.push(node.name.clone());
                if node.code.as_deref() == Some(code) {
                    return Some(RegionSelection {
                        code: code.to_string(),
                        name: node.name.clone(),
                        path: path.clone(),
                    });
                }
                if let Some(found) = walk(&node.zone, code, path) {
                    return Some(found);
                }
                path.pop();
            }
            None
        }

        walk(&self.zone, code, &mut Vec::new())
    }
}

/// Interactive three-level picker over a [`RegionTree`]
pub struct RegionPicker<'a> {
    tree: &'a RegionTree,
    defaults: &'a RegionConfig,
}

impl<'a> RegionPicker<'a> {
    #[must_use]
    pub fn new(tree: &'a RegionTree, defaults: &'a RegionConfig) -> Self {
        Self { tree, defaults }
    }

    /// Walk province, city and district menus and return the chosen district
    ///
    /// Any line that is not a valid item number picks the level's default.
    pub fn select<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<RegionSelection> {
        let provinces = &self.tree.zone;
        if provinces.is_empty() {
            return Err(CnWeatherError::region("未找到省份数据"));
        }

        let (province_default, on_default) =
            Self::default_index(provinces, &self.defaults.default_province, true);
        let (province_idx, on_default) = Self::choose(
            input,
            output,
            provinces,
            "请选择省份（直接回车选择默认值）",
            province_default,
        )?
        .map_or((province_default, on_default), |chosen| {
            (chosen, on_default && chosen == province_default)
        });
        let province = &provinces[province_idx];

        let cities = &province.zone;
        if cities.is_empty() {
            return Err(CnWeatherError::region(format!(
                "未找到 {} 的城市数据",
                province.name
            )));
        }

        let (city_default, on_default) =
            Self::default_index(cities, &self.defaults.default_city, on_default);
        let (city_idx, on_default) = Self::choose(
            input,
            output,
            cities,
            "请选择城市（直接回车选择默认值）",
            city_default,
        )?
        .map_or((city_default, on_default), |chosen| {
            (chosen, on_default && chosen == city_default)
        });
        let city = &cities[city_idx];

        let districts = &city.zone;
        if districts.is_empty() {
            return Err(CnWeatherError::region(format!(
                "未找到 {} 的区县数据",
                city.name
            )));
        }

        let (district_default, _) =
            Self::default_index(districts, &self.defaults.default_district, on_default);
        let district_idx = Self::choose(
            input,
            output,
            districts,
            "请选择区县（直接回车选择默认值）",
            district_default,
        )?
        .unwrap_or(district_default);
        let district = &districts[district_idx];

        let code = district.code.clone().ok_or_else(|| {
            CnWeatherError::region(format!("未找到 {} 的城市代码", district.name))
        })?;

        let selection = RegionSelection {
            code,
            name: district.name.clone(),
            path: vec![
                province.name.clone(),
                city.name.clone(),
                district.name.clone(),
            ],
        };

        writeln!(output, "\n已选择: {}", selection.breadcrumb())?;
        writeln!(output, "城市代码: {}", selection.code)?;
        info!("Selected region {} ({})", selection.breadcrumb(), selection.code);

        Ok(selection)
    }

    /// Index of the configured default, if the parent level was its default too
    fn default_index(items: &[RegionNode], name: &str, parent_on_default: bool) -> (usize, bool) {
        if !parent_on_default {
            return (0, false);
        }
        items
            .iter()
            .position(|item| item.name == name)
            .map_or((0, false), |idx| (idx, true))
    }

    /// Print one menu and read the answer; `None` means "use the default"
    fn choose<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
        items: &[RegionNode],
        title: &str,
        default_idx: usize,
    ) -> Result<Option<usize>> {
        writeln!(output, "\n默认选择: {}", items[default_idx].name)?;
        writeln!(output, "{title}:")?;
        for (i, item) in items.iter().enumerate() {
            writeln!(output, "{}. {}", i + 1, item.name)?;
        }
        write!(output, "请输入选项编号: ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=items.len()).contains(&choice) => Ok(Some(choice - 1)),
            _ => {
                writeln!(output, "已选择默认值: {}", items[default_idx].name)?;
                Ok(None)
            }
        }
    }
}
