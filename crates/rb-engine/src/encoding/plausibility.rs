//! Plausibility scoring for legacy encodings.
//!
//! Several legacy encodings accept the same byte stream. A decoding is judged
//! by the share of its non-ASCII characters that are typical for the script
//! the encoding serves: common ideographs, kana, Hangul syllables, or Latin-1
//! letters.

use super::TextEncoding;

/// Non-ASCII characters examined per decoding.
const SCORE_LIMIT: usize = 1024;

/// Western punctuation and symbols that show up in real windows-1252 text.
const LATIN_SYMBOLS: &str = "€‘’“”–—…•©®°«»·¿¡£§";

/// Share of plausible characters among the non-ASCII ones of a decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Score {
    plausible: usize,
    total: usize,
}

impl Score {
    /// Scores `text` as decoded by `encoding`.
    pub(super) fn of(encoding: TextEncoding, text: &str) -> Self {
        let mut score = Self {
            plausible: 0,
            total: 0,
        };
        let mut previous = ' ';
        for c in text.chars() {
            if !c.is_ascii() {
                score.total += 1;
                if is_plausible(encoding, c, previous) {
                    score.plausible += 1;
                }
                if score.total == SCORE_LIMIT {
                    break;
                }
            }
            previous = c;
        }
        score
    }

    /// Whether this score has a strictly higher plausible share than `other`.
    pub(super) const fn beats(self, other: Self) -> bool {
        self.plausible * other.total > other.plausible * self.total
    }
}

fn is_plausible(encoding: TextEncoding, c: char, previous: char) -> bool {
    match encoding {
        TextEncoding::Gb18030 | TextEncoding::Big5 => is_cjk_punctuation(c) || is_common_hanzi(c),
        TextEncoding::ShiftJis => is_cjk_punctuation(c) || is_kana(c) || is_common_hanzi(c),
        TextEncoding::EucKr => is_cjk_punctuation(c) || COMMON_HANGUL.contains(c),
        // Accented letters sit between ASCII letters; runs of high bytes are
        // a sign of a multibyte encoding read one byte at a time.
        TextEncoding::Windows1252 => previous.is_ascii() && is_latin_letter_or_symbol(c),
        TextEncoding::Utf8 | TextEncoding::Utf8Bom => true,
    }
}

const fn is_cjk_punctuation(c: char) -> bool {
    matches!(c, '\u{3000}'..='\u{303F}' | '\u{FF01}'..='\u{FF5E}')
}

const fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{30A1}'..='\u{30FC}')
}

fn is_common_hanzi(c: char) -> bool {
    COMMON_HANZI.contains(c)
}

fn is_latin_letter_or_symbol(c: char) -> bool {
    (matches!(c, '\u{C0}'..='\u{FF}') && !matches!(c, '×' | '÷')) || LATIN_SYMBOLS.contains(c)
}

/// Frequent Chinese characters in simplified and traditional forms.
const COMMON_HANZI: &str = concat!(
    "的一是不了在人有我他这個个们們中来來上大为為和国國地到以说說时時要就出会會可也你",
    "对對生能而子那得于着下自之年过過发發后後作里裡用道行所然家种種事成方多经經么麼去",
    "法学學如都同现現当當没沒动動面起看定天分还還进進好小部其些主样樣理心她本前开開但",
    "因只从從想实實日者意无無力它与與长長把机機十民第公此已工使情明性知全三又关關点點",
    "正业業外将將两兩高间間由问問很最重并物手应應向头頭文体體政美相见見被利什二等产產",
    "或新己制身果加西月话話合回特代内信表化老给給世位次度门門任常先海通教儿兒原东東声",
    "聲提立及比员員解水名真论論处處走义義各入几口认認条條平系气氣题題活更别別打女变變",
    "四神总總何电電数數安少报報才结結反受目太量再感建务務做接必场場件计計管期市直资資",
    "命山金指许許统統区區保至形社便空决決治展科司五基眼书書非则則听聽白界达達光放强強",
    "即像难難且权權思王完设設式色路记記南品住告类類求据據程北边邊张張该該交规規万萬取",
    "格望觉覺术術领領共确確传傳师師观觀清今切让讓识識候带帶导導争爭运運笑步改收根造言",
    "联聯持组組每车車亲親极極服快办辦议議往元证證近失转轉令准布始怎呢存未远遠叫台单單",
    "具字爱愛流备備连連调調深商算质質团團集百需价價花华華城级級整离離况況请請技际際约",
    "約示复復病息究线線官断斷精满滿支视視消越器容照须須增研写寫称稱功吗嗎包片史查轻輕",
    "易早除找装裝广廣显顯图圖念引历歷首局专專费費号號另周较較注语語仅僅考落随隨选選列",
    "红紅响響虽雖推参參希众眾构構房半节節土投案维維致态態护護兴興验驗责責营營够章音跟",
    "志底站严嚴例防供效续續施留讲講型料终終答紧緊绝絕故按围圍织織境客纪紀举舉密低友诉",
    "訴止细細愿值仍破网網热熱助育属屬限速刻乐樂否状狀率独獨普创創假错錯承印试試预預谁",
    "誰微继繼送急适適夜省初喜源食险險待置居财財环環排纳納获獲模充负負停游疑层層冷略范",
    "竟句室异異简簡判担擔静靜既您积積余检檢差富协協角配修降阶階审審坚堅善读讀超免压壓",
    "银銀买買养養执執乱亂帮幫宣优優著田控税稅份穿背概块塊顿頓敢守托央户戶索款靠评評版",
    "释釋景顾顧登货貨互付换換闻聞危核介坏壞讨討良序升监監临臨亮露永味域括杂雜误誤减減",
    "编編测測败敗梦夢温溫渐漸封救贵貴缺尚移朋画畫班智亦短掌遗遺固席松秘谢謝遇康虑慮幸",
    "均销銷钟鐘藏剧劇票损損旧舊端探录錄附吸予礼禮港板庭归歸含顺順输輸招补補谓謂材逐笔",
    "筆词詞择擇寻尋厂廠博授诺諾卖賣健堂旁宫宮借禁园園谋謀避荣榮束顶頂练練篇馆館遍凡础",
    "礎卷宁寧纸紙训訓私祖丝絲翻握戏戲隐隱熟访訪弱典欲盘盤扩擴盖蓋稳穩忘亿億拥擁齐齊赛",
    "賽趣曲迎虚虛析透购購替努途刑兄迅套毕畢唯轮輪库庫迹跡尤竞競促延震弃棄伟偉申缓緩潜",
    "潛闪閃售灯燈针針络絡抵植纯純筑築折尊混振染盛舞圆圓措姓残殘培迷诚誠宽寬宇摆擺伸盟",
    "末乃订訂彩抽赞贊纷紛违違汇匯币幣丰豐献獻援译譯夺奪距裁偏符触觸课課敬懂召厅廳巧侧",
    "側债債融惯慣享童犹猶挂奖獎厚纵縱障讯訊涉彻徹刊描妙镜鏡签簽彼症仿倾傾牌陷闭閉奋奮",
    "庆慶撤缘緣播季仪儀宜淡旦愈聚径徑恰挑捕珍幕映裂隔启啟尖忠累暂暫估泛荒偿償横橫拒零",
    "码碼灾災偶邦圈润潤堆稍迟遲废廢净淨署御奉旋矿礦倍盾租骑騎乏隆诊診渡甘耐抢搶绪緒粗",
    "幻皆碎综綜返薄扫掃敏殖详詳允幅剩颗顆赏賞漫舒浮辞辭键鍵尺昨辈輩贯貫侦偵滑券崇扰擾",
    "宪憲绕繞趋趨阅閱插粉拔媒佩龄齡驱驅惜兼跃躍届屆欣惠册冊储儲闲閒洁潔踪蹤频頻磨递遞",
    "撞拟擬滚滾奏巡颜顏剂劑绩績贡貢截燃焦伪偽锁鎖逼劝勸搜勤戒驾駕饮飲柔腐幼践踐籍佳浓",
    "濃稿跌逻邏垂遵脉貌猜惑帐帳饰飾贷貸叙敘钢鋼沟溝寄扶铺鋪询詢盗盜尝嘗辉輝奈扣迁遷凝",
    "慰厌厭腾騰幽埋泉紫艰艱慌祝邮郵鉴鑑械邻鄰挤擠弯彎陪割揭悟聪聰锋鋒梯祥阔闊誉譽筹籌",
    "丛叢牵牽阁閣屈旨臂贺賀柱抛牢迈邁欺衰恼惱诱誘池冠粒遥遙尘塵抚撫浅淺纠糾钻鑽晶苍蒼",
    "喷噴耗敲赔賠涂塗粹亏虧寂循暖赋賦抑宿踏烂爛档檔夹项項址软軟硬页頁窗钮鈕菜警标標",
);

/// Frequent Hangul syllables.
const COMMON_HANGUL: &str = concat!(
    "이다는의에하고를을가지한서로기사수어국스트대자아리도나인정그시일있것들해게적으보",
    "요우면만전주부상및거라계과비제소회데무오장러여조되방동위원경개내구신성학니관문세",
    "모마치생연중실유업분민야선공화물발력양당체통간점행용두련결명미법입작단함식영감날",
    "합재저향까었았습텍최될같더했던없또번말안녕때후년월음많은파테희너누엇디언왜떻좋새",
    "운름품설버값목록폴",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_only_non_ascii() {
        let score = Score::of(TextEncoding::Gb18030, "中文 Old\n");
        assert_eq!(score, Score { plausible: 2, total: 2 });
    }

    #[test]
    fn test_score_ratio_comparison() {
        let half = Score { plausible: 1, total: 2 };
        let same = Score { plausible: 2, total: 4 };
        let full = Score { plausible: 3, total: 3 };
        assert!(full.beats(half));
        assert!(!half.beats(same));
        assert!(!same.beats(half));
        assert!(!half.beats(full));
    }

    #[test]
    fn test_latin_letters_need_ascii_neighbour() {
        assert_eq!(
            Score::of(TextEncoding::Windows1252, "café naïve"),
            Score { plausible: 2, total: 2 }
        );
        // "中文" read as windows-1252.
        assert_eq!(
            Score::of(TextEncoding::Windows1252, "ÖÐÎÄ"),
            Score { plausible: 1, total: 4 }
        );
    }

    #[test]
    fn test_kana_is_plausible_only_for_shift_jis() {
        assert!(is_plausible(TextEncoding::ShiftJis, 'の', ' '));
        assert!(!is_plausible(TextEncoding::Gb18030, 'の', ' '));
        assert!(!is_plausible(TextEncoding::ShiftJis, 'ﾖ', ' '));
    }

    #[test]
    fn test_hangul_is_plausible_only_for_euc_kr() {
        assert!(is_plausible(TextEncoding::EucKr, '한', ' '));
        assert!(!is_plausible(TextEncoding::Big5, '한', ' '));
    }
}
