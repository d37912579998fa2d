//! 测试用的假页面和假渲染器
//!
//! `FakeSite` 模拟下单页面的状态：提示框、表单、提交错误提示、收据。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use robot_order::config::Selectors;
use robot_order::{Config, DocumentRenderer, Order, RobotError, RobotResult, UiDriver};

#[derive(Debug, Default)]
struct SiteState {
    calls: Vec<String>,
    modal_visible: bool,
    address: String,
    error_visible: bool,
    receipt_visible: bool,
    submit_clicks: HashMap<String, usize>,
    navigations: usize,
}

pub struct FakeSite {
    selectors: Selectors,
    /// 按地址配置的提交拒绝次数
    rejections: Mutex<HashMap<String, usize>>,
    /// 不存在的元素
    missing: HashSet<String>,
    /// 截图总是失败
    broken_screenshot: bool,
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::default(),
            rejections: Mutex::new(HashMap::new()),
            missing: HashSet::new(),
            broken_screenshot: false,
            state: Mutex::new(SiteState {
                modal_visible: true,
                ..Default::default()
            }),
        }
    }

    /// 地址为 `address` 的订单前 `times` 次提交被拒绝
    pub fn reject(self, address: &str, times: usize) -> Self {
        self.rejections
            .lock()
            .unwrap()
            .insert(address.to_string(), times);
        self
    }

    pub fn without(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    pub fn without_screenshots(mut self) -> Self {
        self.broken_screenshot = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn submit_clicks(&self, address: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .submit_clicks
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub fn navigations(&self) -> usize {
        self.state.lock().unwrap().navigations
    }

    fn check_present(&self, action: &'static str, selector: &str) -> RobotResult<()> {
        if self.missing.contains(selector) {
            return Err(RobotError::ui(action, selector, "no node found"));
        }
        Ok(())
    }
}

#[async_trait]
impl UiDriver for FakeSite {
    async fn navigate(&self, url: &str) -> RobotResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("navigate {}", url));
        state.navigations += 1;
        state.modal_visible = true;
        state.error_visible = false;
        state.receipt_visible = false;
        state.address.clear();
        Ok(())
    }

    async fn click(&self, selector: &str) -> RobotResult<()> {
        self.check_present("click", selector)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("click {}", selector));

        if selector == self.selectors.modal_ok {
            state.modal_visible = false;
        } else if selector == self.selectors.submit {
            let address = state.address.clone();
            *state.submit_clicks.entry(address.clone()).or_insert(0) += 1;

            let mut rejections = self.rejections.lock().unwrap();
            match rejections.get_mut(&address) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    state.error_visible = true;
                }
                _ => {
                    state.error_visible = false;
                    state.receipt_visible = true;
                }
            }
        } else if selector == self.selectors.order_another {
            if !state.receipt_visible {
                return Err(RobotError::ui("click", selector, "no node found"));
            }
            state.receipt_visible = false;
            state.modal_visible = true;
            state.address.clear();
        }
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> RobotResult<()> {
        self.check_present("select_option", selector)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("select {} {}", selector, value));
        Ok(())
    }

    async fn fill_text(&self, selector: &str, value: &str) -> RobotResult<()> {
        self.check_present("fill_text", selector)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("fill {} {}", selector, value));
        if selector == self.selectors.address {
            state.address = value.to_string();
        }
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> RobotResult<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push("screenshot".to_string());
        if self.broken_screenshot {
            return Err(RobotError::ui(
                "screenshot",
                path.display().to_string(),
                "capture failed",
            ));
        }
        write_png(path);
        Ok(())
    }

    async fn read_inner_markup(&self, selector: &str) -> RobotResult<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("read {}", selector));
        if selector != self.selectors.receipt || !state.receipt_visible {
            return Err(RobotError::ui("read_inner_markup", selector, "no node found"));
        }
        Ok(format!("<h3>Receipt</h3><p>{}</p>", state.address))
    }

    async fn query_optional(&self, selector: &str) -> RobotResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("query {}", selector));
        let present = if selector == self.selectors.modal_ok {
            state.modal_visible
        } else if selector == self.selectors.error_alert {
            state.error_visible
        } else {
            false
        };
        Ok(present)
    }
}

/// 把 HTML 当成纯文本写进单页 PDF
#[derive(Default)]
pub struct FakeRenderer {
    rendered: Mutex<Vec<PathBuf>>,
}

impl FakeRenderer {
    pub fn rendered(&self) -> Vec<PathBuf> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render_html_to_document(&self, markup: &str, path: &Path) -> RobotResult<()> {
        write_pdf(path, markup);
        self.rendered.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

pub fn write_png(path: &Path) {
    image::RgbImage::from_pixel(64, 48, image::Rgb([10, 120, 200]))
        .save(path)
        .unwrap();
}

pub fn order(number: &str) -> Order {
    Order::new(number, number, "2", "3", format!("Address {}", number))
}

pub fn test_config(output_dir: &Path) -> Config {
    Config {
        output_dir: output_dir.to_string_lossy().to_string(),
        output_log_file: output_dir.join("run.log").to_string_lossy().to_string(),
        max_submit_attempts: 5,
        settle_delay_ms: 0,
        ..Config::default()
    }
}

/// 压缩包内的文件名和每个 PDF 的页数
pub fn unpack_page_counts(archive: &Path) -> Vec<(String, usize)> {
    use std::io::Read;

    let mut zip = zip::ZipArchive::new(std::fs::File::open(archive).unwrap()).unwrap();
    let mut result = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        let pages = Document::load_mem(&bytes).unwrap().get_pages().len();
        result.push((entry.name().to_string(), pages));
    }
    result.sort();
    result
}
